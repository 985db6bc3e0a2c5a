//! Operation classifier.
//!
//! Splits an ordered batch into one sub-list per [`OperationGroup`] so each
//! group can be persisted as a single transaction. Requests keep their
//! relative order inside a group; none are dropped or duplicated.

use strum::{EnumCount, IntoEnumIterator};

use crate::error::Result;
use crate::request::{ChangeRequest, OperationGroup, RawChangeRequest};

/// A change batch grouped by [`OperationGroup`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedBatch {
    groups: [Vec<ChangeRequest>; OperationGroup::COUNT],
}

impl ClassifiedBatch {
    pub fn from_requests(requests: impl IntoIterator<Item = ChangeRequest>) -> Self {
        let mut batch = Self::default();
        for request in requests {
            batch.groups[request.kind().group().order()].push(request);
        }
        batch
    }

    /// Classify wire-format requests, rejecting unknown operation kinds.
    ///
    /// Fails on the first request that does not convert, before anything is
    /// grouped.
    pub fn from_raw(requests: impl IntoIterator<Item = RawChangeRequest>) -> Result<Self> {
        let typed = requests
            .into_iter()
            .map(ChangeRequest::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_requests(typed))
    }

    pub fn group(&self, group: OperationGroup) -> &[ChangeRequest] {
        &self.groups[group.order()]
    }

    /// Non-empty groups in application order.
    pub fn groups(&self) -> impl Iterator<Item = (OperationGroup, &[ChangeRequest])> {
        OperationGroup::iter()
            .map(|group| (group, self.group(group)))
            .filter(|(_, requests)| !requests.is_empty())
    }

    /// Every request in application order.
    pub fn requests(&self) -> impl Iterator<Item = &ChangeRequest> {
        self.groups.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }
}

impl FromIterator<ChangeRequest> for ClassifiedBatch {
    fn from_iter<T: IntoIterator<Item = ChangeRequest>>(iter: T) -> Self {
        Self::from_requests(iter)
    }
}
