use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follow::Table)
                    .col(
                        ColumnDef::new(Follow::UserId)
                            .uuid()
                            .not_null()
                    )
                    .col(
                        ColumnDef::new(Follow::TargetId)
                            .uuid()
                            .not_null()
                    )
                    .primary_key(
                        Index::create()
                            .col(Follow::UserId)
                            .col(Follow::TargetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_user")
                            .from(Follow::Table, Follow::UserId)
                            .to(User::Table, User::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned()
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .col(
                        ColumnDef::new(Favorite::UserId)
                            .uuid()
                            .not_null()
                    )
                    .col(
                        ColumnDef::new(Favorite::ItemId)
                            .uuid()
                            .not_null()
                    )
                    .primary_key(
                        Index::create()
                            .col(Favorite::UserId)
                            .col(Favorite::ItemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_user")
                            .from(Favorite::Table, Favorite::UserId)
                            .to(User::Table, User::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned()
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Favorite::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Follow::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Follow {
    Table,
    UserId,
    TargetId,
}

#[derive(DeriveIden)]
enum Favorite {
    Table,
    UserId,
    ItemId,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
