use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KvStrings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KvStrings::StoreKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(KvStrings::Value).string().not_null())
                    // Unix millis; NULL means the key never expires
                    .col(ColumnDef::new(KvStrings::ExpiresAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KvHashFields::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(KvHashFields::StoreKey).string().not_null())
                    .col(ColumnDef::new(KvHashFields::Field).string().not_null())
                    .col(ColumnDef::new(KvHashFields::Value).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(KvHashFields::StoreKey)
                            .col(KvHashFields::Field),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KvSortedSetMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KvSortedSetMembers::StoreKey)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(KvSortedSetMembers::Member).string().not_null())
                    .col(
                        ColumnDef::new(KvSortedSetMembers::Score)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(KvSortedSetMembers::StoreKey)
                            .col(KvSortedSetMembers::Member),
                    )
                    .to_owned(),
            )
            .await?;

        // Ranked reads walk a single set ordered by score
        manager
            .create_index(
                Index::create()
                    .name("idx_kv_sorted_set_members_key_score")
                    .table(KvSortedSetMembers::Table)
                    .col(KvSortedSetMembers::StoreKey)
                    .col(KvSortedSetMembers::Score)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KvSortedSetMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KvHashFields::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KvStrings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum KvStrings {
    Table,
    StoreKey,
    Value,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum KvHashFields {
    Table,
    StoreKey,
    Field,
    Value,
}

#[derive(DeriveIden)]
enum KvSortedSetMembers {
    Table,
    StoreKey,
    Member,
    Score,
}
