use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use log::info;

use crate::errors::MealResult;

type DBPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DBConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

const CREATE_MEAL_TABLE: &str = include_str!("../../sql/create_meal_table.sql");

/// Writers wait for the lock instead of failing with "database is locked".
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        connection
            .batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: DBPool,
}

impl Database {
    /// Opens a pool against the SQLite file at `database_url`, creating its
    /// parent directory if needed, and makes sure the meals table exists.
    pub fn new(database_url: &str) -> MealResult<Self> {
        if database_url == ":memory:" {
            return Self::in_memory();
        }
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;
        let db = Database { pool };
        db.create_tables()?;
        info!("Connected to database at {}", database_url);
        Ok(db)
    }

    /// Every connection to `:memory:` is its own database, so the pool holds a
    /// single connection that never expires.
    pub fn in_memory() -> MealResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;
        let db = Database { pool };
        db.create_tables()?;
        Ok(db)
    }

    pub fn get_connection(&self) -> MealResult<DBConnection> {
        Ok(self.pool.get()?)
    }

    pub fn create_tables(&self) -> MealResult<()> {
        let mut connection = self.get_connection()?;
        connection.batch_execute(CREATE_MEAL_TABLE)?;
        Ok(())
    }

    pub fn recreate_tables(&self) -> MealResult<()> {
        let mut connection = self.get_connection()?;
        connection.batch_execute("DROP TABLE IF EXISTS meals;")?;
        connection.batch_execute(CREATE_MEAL_TABLE)?;
        Ok(())
    }

    pub fn check_health(&self) -> MealResult<()> {
        let mut connection = self.get_connection()?;
        connection.batch_execute("SELECT 1 FROM meals LIMIT 1;")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::models::meal::SortBy;
    use crate::repository::meal_repository;

    #[test]
    fn test_should_open_in_memory_database_with_meals_table() {
        let db = Database::in_memory().unwrap();
        assert!(db.check_health().is_ok());
    }

    #[test]
    fn test_should_fail_health_check_when_table_is_missing() {
        let db = Database::in_memory().unwrap();
        let mut connection = db.get_connection().unwrap();
        connection.batch_execute("DROP TABLE meals;").unwrap();
        drop(connection);

        assert!(db.check_health().is_err());
        db.create_tables().unwrap();
        assert!(db.check_health().is_ok());
    }

    #[test]
    fn test_should_create_missing_parent_directory_for_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("meal_max.db");

        let db = Database::new(path.to_str().unwrap()).unwrap();

        assert!(path.exists());
        assert!(db.check_health().is_ok());
    }

    #[test]
    fn test_should_accept_concurrent_writers_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal_max.db");
        let db = Arc::new(Database::new(path.to_str().unwrap()).unwrap());

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    (0..25)
                        .map(|n| {
                            let name = format!("Meal {}-{}", writer, n);
                            meal_repository::create_meal(&db, &name, "Fusion", 5.0, "MED")
                        })
                        .filter(Result::is_err)
                        .count()
                })
            })
            .collect();
        let failures: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();

        assert_eq!(failures, 0);
        let leaderboard = meal_repository::get_leaderboard(&db, SortBy::Wins).unwrap();
        assert_eq!(leaderboard.len(), 200);
    }
}
