//! SQLite MovesetStore backed by sqlx.

use std::str::FromStr;

use async_trait::async_trait;
use moveset_core::{CreatureId, LearnMethod, LearnRow, MoveId, Statement, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::catalog::MoveCatalog;
use crate::repository::{MovesetStore, Result, StoreError};

/// Placeholder move id used while exchanging two moves' rows.
///
/// Catalog ids are positive, so no real row ever carries it.
const EXCHANGE_PLACEHOLDER: i64 = -1;

const CREATE_MOVESETS: &str = "CREATE TABLE IF NOT EXISTS pokemon_movesets (
    pokemon INTEGER NOT NULL,
    move INTEGER NOT NULL,
    learn_method TEXT NOT NULL,
    level_learned INTEGER NOT NULL,
    UNIQUE (pokemon, move, learn_method)
)";

const CREATE_MOVES: &str = "CREATE TABLE IF NOT EXISTS moves (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
)";

/// `pokemon_movesets` stored in a SQLite database.
///
/// Every [`Transaction`] runs inside one SQLite transaction. The pool holds a
/// single connection: the store is a shared, non-reentrant resource.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        tracing::debug!(url, "opened sqlite moveset store");
        Ok(store)
    }

    /// Private in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_MOVESETS).execute(&self.pool).await?;
        sqlx::query(CREATE_MOVES).execute(&self.pool).await?;
        Ok(())
    }

    /// Read the `moves` table into a catalog.
    pub async fn load_move_catalog(&self) -> Result<MoveCatalog> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM moves ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| (name, MoveId(id)))
            .collect())
    }

    /// Upsert every catalog entry into the `moves` table.
    pub async fn register_moves(&self, catalog: &MoveCatalog) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (name, id) in catalog.iter() {
            sqlx::query(
                "INSERT INTO moves (id, name) VALUES (?, ?)
                 ON CONFLICT (id) DO UPDATE SET name = excluded.name",
            )
            .bind(id.0)
            .bind(name)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

async fn execute_statement(
    conn: &mut SqliteConnection,
    creature: CreatureId,
    statement: &Statement,
) -> Result<()> {
    match statement {
        Statement::InsertRows(rows) => {
            if rows.is_empty() {
                return Ok(());
            }
            let mut query = QueryBuilder::<Sqlite>::new(
                "INSERT INTO pokemon_movesets (pokemon, move, learn_method, level_learned) ",
            );
            query.push_values(rows, |mut values, row| {
                values
                    .push_bind(creature.0)
                    .push_bind(row.move_id.0)
                    .push_bind(<&'static str>::from(row.learn_method))
                    .push_bind(i64::from(row.level_learned));
            });
            query.push(
                " ON CONFLICT (pokemon, move, learn_method) \
                 DO UPDATE SET level_learned = excluded.level_learned",
            );
            query.build().execute(&mut *conn).await?;
        }
        Statement::UpdateLevel { move_id, level } => {
            sqlx::query(
                "UPDATE pokemon_movesets SET level_learned = ? WHERE pokemon = ? AND move = ?",
            )
            .bind(i64::from(*level))
            .bind(creature.0)
            .bind(move_id.0)
            .execute(&mut *conn)
            .await?;
        }
        Statement::DeleteMoves(move_ids) => {
            if move_ids.is_empty() {
                return Ok(());
            }
            let mut query =
                QueryBuilder::<Sqlite>::new("DELETE FROM pokemon_movesets WHERE pokemon = ");
            query.push_bind(creature.0).push(" AND move IN (");
            let mut ids = query.separated(", ");
            for move_id in move_ids {
                ids.push_bind(move_id.0);
            }
            ids.push_unseparated(")");
            query.build().execute(&mut *conn).await?;
        }
        Statement::RetainMethods { move_id, methods } => {
            let mut query =
                QueryBuilder::<Sqlite>::new("DELETE FROM pokemon_movesets WHERE pokemon = ");
            query
                .push_bind(creature.0)
                .push(" AND move = ")
                .push_bind(move_id.0);
            let kept: Vec<&'static str> = methods.methods().map(<&'static str>::from).collect();
            if !kept.is_empty() {
                query.push(" AND learn_method NOT IN (");
                let mut names = query.separated(", ");
                for name in kept {
                    names.push_bind(name);
                }
                names.push_unseparated(")");
            }
            query.build().execute(&mut *conn).await?;
        }
        Statement::ExchangeMoves { first, second } => {
            // The unique key is checked per row, so route one side through a placeholder.
            for (from, to) in [
                (first.0, EXCHANGE_PLACEHOLDER),
                (second.0, first.0),
                (EXCHANGE_PLACEHOLDER, second.0),
            ] {
                sqlx::query("UPDATE pokemon_movesets SET move = ? WHERE pokemon = ? AND move = ?")
                    .bind(to)
                    .bind(creature.0)
                    .bind(from)
                    .execute(&mut *conn)
                    .await?;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl MovesetStore for SqliteStore {
    async fn load(&self, creature: CreatureId) -> Result<Vec<LearnRow>> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT move, learn_method, level_learned FROM pokemon_movesets \
             WHERE pokemon = ? ORDER BY rowid",
        )
        .bind(creature.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(move_id, learn_method, level_learned)| -> Result<LearnRow> {
                let learn_method = LearnMethod::from_str(&learn_method).map_err(|_| {
                    StoreError::CorruptedRow(format!(
                        "creature {} move {} has unknown learn method `{}`",
                        creature, move_id, learn_method
                    ))
                })?;
                let level_learned = u32::try_from(level_learned).map_err(|_| {
                    StoreError::CorruptedRow(format!(
                        "creature {} move {} has level {}",
                        creature, move_id, level_learned
                    ))
                })?;
                Ok(LearnRow {
                    move_id: MoveId(move_id),
                    learn_method,
                    level_learned,
                })
            })
            .collect()
    }

    async fn execute(&self, transaction: &Transaction) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for statement in &transaction.statements {
            // Dropping `tx` on error rolls the whole transaction back.
            execute_statement(&mut tx, transaction.creature, statement).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            creature = %transaction.creature,
            statements = transaction.statements.len(),
            "committed transaction to sqlite store"
        );
        Ok(())
    }
}
