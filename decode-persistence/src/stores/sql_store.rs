use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

use super::{KeyValueStore, RangeOrder, SetOptions, SortedSetEntry, resolve_rank_range};
use crate::entities::{kv_hash_fields, kv_sorted_set_members, kv_strings, prelude::*};
use crate::{StoreError, StoreResult};

/// [`KeyValueStore`] over the SQLite tables created by the `migration` crate.
///
/// Single-key writes run inside one transaction so that increment-and-read is
/// observed atomically by the caller.
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[async_trait]
impl KeyValueStore for SqlStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let row = KvStrings::find_by_id(key.to_string()).one(&self.db).await?;
        let now = Self::now_millis();
        Ok(row.filter(|row| row.is_live(now)).map(|row| row.value))
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> StoreResult<bool> {
        let now = Self::now_millis();
        let txn = self.db.begin().await?;

        if options.only_if_absent {
            let existing = KvStrings::find_by_id(key.to_string()).one(&txn).await?;
            if existing.is_some_and(|row| row.is_live(now)) {
                txn.commit().await?;
                return Ok(false);
            }
        }

        let model = kv_strings::ActiveModel {
            store_key: Set(key.to_string()),
            value: Set(value.to_string()),
            expires_at: Set(options.ttl.map(|ttl| now + ttl.as_millis() as i64)),
        };

        KvStrings::insert(model)
            .on_conflict(
                OnConflict::column(kv_strings::Column::StoreKey)
                    .update_columns([kv_strings::Column::Value, kv_strings::Column::ExpiresAt])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let row = KvHashFields::find_by_id((key.to_string(), field.to_string()))
            .one(&self.db)
            .await?;
        Ok(row.map(|row| row.value))
    }

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let models = fields
            .into_iter()
            .map(|(field, value)| kv_hash_fields::ActiveModel {
                store_key: Set(key.to_string()),
                field: Set(field),
                value: Set(value),
            });

        KvHashFields::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    kv_hash_fields::Column::StoreKey,
                    kv_hash_fields::Column::Field,
                ])
                .update_column(kv_hash_fields::Column::Value)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn hget_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let rows = KvHashFields::find()
            .filter(kv_hash_fields::Column::StoreKey.eq(key))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|row| (row.field, row.value)).collect())
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: i64) -> StoreResult<i64> {
        let txn = self.db.begin().await?;

        let model = kv_sorted_set_members::ActiveModel {
            store_key: Set(key.to_string()),
            member: Set(member.to_string()),
            score: Set(delta),
        };

        KvSortedSetMembers::insert(model)
            .on_conflict(
                OnConflict::columns([
                    kv_sorted_set_members::Column::StoreKey,
                    kv_sorted_set_members::Column::Member,
                ])
                .value(
                    kv_sorted_set_members::Column::Score,
                    Expr::col(kv_sorted_set_members::Column::Score).add(delta),
                )
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let row = KvSortedSetMembers::find_by_id((key.to_string(), member.to_string()))
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::Malformed {
                key: key.to_string(),
                reason: format!("member '{}' missing after increment", member),
            })?;

        txn.commit().await?;
        Ok(row.score)
    }

    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()> {
        let model = kv_sorted_set_members::ActiveModel {
            store_key: Set(key.to_string()),
            member: Set(member.to_string()),
            score: Set(score),
        };

        KvSortedSetMembers::insert(model)
            .on_conflict(
                OnConflict::columns([
                    kv_sorted_set_members::Column::StoreKey,
                    kv_sorted_set_members::Column::Member,
                ])
                .update_column(kv_sorted_set_members::Column::Score)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn zcard(&self, key: &str) -> StoreResult<u64> {
        let count = KvSortedSetMembers::find()
            .filter(kv_sorted_set_members::Column::StoreKey.eq(key))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>> {
        let row = KvSortedSetMembers::find_by_id((key.to_string(), member.to_string()))
            .one(&self.db)
            .await?;
        Ok(row.map(|row| row.score))
    }

    async fn zrange(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> StoreResult<Vec<SortedSetEntry>> {
        // Count and window must see the same snapshot
        let txn = self.db.begin().await?;

        let len = KvSortedSetMembers::find()
            .filter(kv_sorted_set_members::Column::StoreKey.eq(key))
            .count(&txn)
            .await?;
        let Some((start, stop)) = resolve_rank_range(len, start, stop) else {
            txn.commit().await?;
            return Ok(Vec::new());
        };

        let query = KvSortedSetMembers::find()
            .filter(kv_sorted_set_members::Column::StoreKey.eq(key));
        let query = match order {
            RangeOrder::Ascending => {
                query.order_by_asc(kv_sorted_set_members::Column::Score)
            }
            RangeOrder::Descending => {
                query.order_by_desc(kv_sorted_set_members::Column::Score)
            }
        };

        let rows = query
            .order_by_asc(kv_sorted_set_members::Column::Member)
            .offset(start)
            .limit(stop - start + 1)
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| SortedSetEntry {
                member: row.member,
                score: row.score,
            })
            .collect())
    }
}
