use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::people;

#[derive(Debug, Clone)]
pub struct Person {
    pub id: i32,
    pub forename: String,
    pub family_name: String,
    pub gender: String,
    pub year_of_birth: i32,
}

impl From<people::Model> for Person {
    fn from(model: people::Model) -> Self {
        Self {
            id: model.id,
            forename: model.forename,
            family_name: model.family_name,
            gender: model.gender,
            year_of_birth: model.year_of_birth,
        }
    }
}

/// Validated field values for an insert or update.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub forename: String,
    pub family_name: String,
    pub gender: String,
    pub year_of_birth: i32,
}

impl NewPerson {
    /// Display identity used in duplicate reports.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{} {}", self.forename, self.family_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonSortKey {
    #[default]
    Id,
    Forename,
    FamilyName,
    Gender,
    YearOfBirth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

pub struct PersonRepository {
    conn: DatabaseConnection,
}

impl PersonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List people with optional case-insensitive substring search over
    /// both name fields. Search and sort never drop rows from the result,
    /// they only filter and reorder.
    pub async fn list(
        &self,
        sort: PersonSortKey,
        order: SortOrder,
        search: Option<&str>,
    ) -> Result<Vec<Person>> {
        let mut query = people::Entity::find();

        if let Some(term) = search {
            let term = term.trim();
            if !term.is_empty() {
                let pattern = format!("%{}%", term.to_lowercase());
                query = query.filter(
                    Condition::any()
                        .add(
                            Expr::expr(Func::lower(Expr::col(people::Column::Forename)))
                                .like(pattern.clone()),
                        )
                        .add(
                            Expr::expr(Func::lower(Expr::col(people::Column::FamilyName)))
                                .like(pattern),
                        ),
                );
            }
        }

        let column = match sort {
            PersonSortKey::Id => people::Column::Id,
            PersonSortKey::Forename => people::Column::Forename,
            PersonSortKey::FamilyName => people::Column::FamilyName,
            PersonSortKey::Gender => people::Column::Gender,
            PersonSortKey::YearOfBirth => people::Column::YearOfBirth,
        };
        let direction = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        query = query.order_by(column, direction);
        if sort != PersonSortKey::Id {
            // Stable tiebreaker so equal keys keep a deterministic order.
            query = query.order_by_asc(people::Column::Id);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list people")?;

        Ok(rows.into_iter().map(Person::from).collect())
    }

    /// Get a person by ID
    pub async fn get(&self, id: i32) -> Result<Option<Person>> {
        let person = people::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query person by ID")?;

        Ok(person.map(Person::from))
    }

    /// Insert one person. Returns `None` when the store rejects the row
    /// as a duplicate name pair.
    pub async fn insert(&self, row: NewPerson) -> Result<Option<Person>> {
        let model = people::ActiveModel {
            forename: Set(row.forename),
            family_name: Set(row.family_name),
            gender: Set(row.gender),
            year_of_birth: Set(row.year_of_birth),
            ..Default::default()
        };

        let insert = people::Entity::insert(model)
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec(&self.conn)
            .await;

        match insert {
            Ok(result) => self.get(result.last_insert_id).await,
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(e).context("Failed to insert person"),
        }
    }

    /// Update all editable fields of a person. Returns `None` when the
    /// row does not exist.
    pub async fn update(&self, id: i32, row: NewPerson) -> Result<Option<Person>> {
        let Some(existing) = people::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query person for update")?
        else {
            return Ok(None);
        };

        let mut active: people::ActiveModel = existing.into();
        active.forename = Set(row.forename);
        active.family_name = Set(row.family_name);
        active.gender = Set(row.gender);
        active.year_of_birth = Set(row.year_of_birth);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update person")?;

        Ok(Some(Person::from(updated)))
    }

    /// Case-insensitive existence check on the full name pair. `exclude`
    /// skips a row so updates do not collide with themselves.
    pub async fn exists(
        &self,
        forename: &str,
        family_name: &str,
        exclude: Option<i32>,
    ) -> Result<bool> {
        let mut query = people::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(people::Column::Forename)))
                    .eq(forename.to_lowercase()),
            )
            .filter(
                Expr::expr(Func::lower(Expr::col(people::Column::FamilyName)))
                    .eq(family_name.to_lowercase()),
            );

        if let Some(id) = exclude {
            query = query.filter(people::Column::Id.ne(id));
        }

        let person = query
            .one(&self.conn)
            .await
            .context("Failed to check person existence")?;

        Ok(person.is_some())
    }

    /// Delete a person by ID. Returns false when no row matched.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = people::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete person")?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every person whose ID appears in `ids`. Missing IDs are
    /// ignored. Returns the number of rows removed.
    pub async fn delete_many(&self, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = people::Entity::delete_many()
            .filter(people::Column::Id.is_in(ids.to_vec()))
            .exec(&self.conn)
            .await
            .context("Failed to delete people")?;

        Ok(result.rows_affected)
    }

    /// Insert a batch of validated rows in one transaction. Rows the
    /// store rejects as duplicate name pairs are skipped, not fatal;
    /// their identities are returned so the caller can reclassify them.
    pub async fn insert_batch(&self, rows: Vec<NewPerson>) -> Result<Vec<String>> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open import transaction")?;

        let mut skipped = Vec::new();

        for row in rows {
            let identity = row.identity();
            let model = people::ActiveModel {
                forename: Set(row.forename),
                family_name: Set(row.family_name),
                gender: Set(row.gender),
                year_of_birth: Set(row.year_of_birth),
                ..Default::default()
            };

            let insert = people::Entity::insert(model)
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .exec(&txn)
                .await;

            match insert {
                Ok(_) => {}
                Err(DbErr::RecordNotInserted) => skipped.push(identity),
                Err(e) => return Err(e).context("Failed to insert imported person"),
            }
        }

        txn.commit()
            .await
            .context("Failed to commit import transaction")?;

        Ok(skipped)
    }
}
