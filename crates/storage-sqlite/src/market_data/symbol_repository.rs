use diesel::prelude::*;
use std::sync::Arc;

use super::model::SymbolProfileDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::symbols::dsl as symbols_dsl;
use crate::utils::chunk_for_sqlite;
use paperfolio_core::market_data::{SymbolProfile, SymbolRepositoryTrait};
use paperfolio_core::Result;

pub struct SymbolRepository {
    pool: Arc<DbPool>,
}

impl SymbolRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl SymbolRepositoryTrait for SymbolRepository {
    fn get_all(&self) -> Result<Vec<SymbolProfile>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = symbols_dsl::symbols
            .order(symbols_dsl::symbol.asc())
            .load::<SymbolProfileDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(SymbolProfile::from).collect())
    }

    fn append_symbols(&self, profiles: &[SymbolProfile]) -> Result<usize> {
        if profiles.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<SymbolProfileDB> = profiles.iter().map(SymbolProfileDB::from).collect();

        let mut inserted = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            inserted += diesel::insert_or_ignore_into(symbols_dsl::symbols)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use tempfile::tempdir;

    fn test_repository() -> (SymbolRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
        let pool = create_pool(&db_path).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (SymbolRepository::new(pool), temp_dir)
    }

    fn profile(symbol: &str) -> SymbolProfile {
        SymbolProfile {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            security_name: format!("{} Inc. Common Stock", symbol),
            security_type: "cs".to_string(),
            region: "US".to_string(),
            currency: "USD".to_string(),
            exchange: "NYS".to_string(),
            industry: "Packaged Software".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_get_all_on_empty_store() {
        let (repo, _guard) = test_repository();
        assert!(repo.get_all().expect("get_all failed").is_empty());
    }

    #[test]
    fn test_append_symbols_skips_existing() {
        let (repo, _guard) = test_repository();

        let inserted = repo
            .append_symbols(&[profile("AAA"), profile("BBB")])
            .expect("append failed");
        assert_eq!(inserted, 2);

        // BBB is already stored and must not be duplicated or overwritten.
        let mut changed = profile("BBB");
        changed.exchange = "NAS".to_string();
        let inserted = repo
            .append_symbols(&[changed, profile("CCC")])
            .expect("append failed");
        assert_eq!(inserted, 1);

        let all = repo.get_all().expect("get_all failed");
        assert_eq!(all.len(), 3);
        let bbb = all.iter().find(|p| p.symbol == "BBB").expect("BBB stored");
        assert_eq!(bbb.exchange, "NYS");
        assert!(bbb.enabled);
    }
}
