//! `SeaORM` implementation of the `PersonService` trait.

use crate::constants::people;
use crate::db::{NewPerson, Person, PersonSortKey, SortOrder, Store};
use crate::services::person_service::{PersonError, PersonInput, PersonService};
use async_trait::async_trait;

pub struct SeaOrmPersonService {
    store: Store,
}

impl SeaOrmPersonService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate(input: PersonInput) -> Result<NewPerson, PersonError> {
    let forename = input.forename.trim().to_string();
    let family_name = input.family_name.trim().to_string();
    let gender = input.gender.trim().to_string();

    if forename.is_empty() {
        return Err(PersonError::validation(
            "forename",
            "Forename cannot be empty",
        ));
    }

    if family_name.is_empty() {
        return Err(PersonError::validation(
            "family_name",
            "Family name cannot be empty",
        ));
    }

    if gender.is_empty() {
        return Err(PersonError::validation("gender", "Gender cannot be empty"));
    }

    if !(people::MIN_YEAR_OF_BIRTH..=people::MAX_YEAR_OF_BIRTH).contains(&input.year_of_birth) {
        return Err(PersonError::validation(
            "year_of_birth",
            format!(
                "Year of birth must be between {} and {}",
                people::MIN_YEAR_OF_BIRTH,
                people::MAX_YEAR_OF_BIRTH
            ),
        ));
    }

    Ok(NewPerson {
        forename,
        family_name,
        gender,
        year_of_birth: input.year_of_birth,
    })
}

#[async_trait]
impl PersonService for SeaOrmPersonService {
    async fn list(
        &self,
        sort: PersonSortKey,
        order: SortOrder,
        search: Option<&str>,
    ) -> Result<Vec<Person>, PersonError> {
        let people = self.store.list_people(sort, order, search).await?;
        Ok(people)
    }

    async fn get(&self, id: i32) -> Result<Person, PersonError> {
        self.store
            .get_person(id)
            .await?
            .ok_or(PersonError::PersonNotFound)
    }

    async fn create(&self, input: PersonInput) -> Result<Person, PersonError> {
        let row = validate(input)?;

        if self
            .store
            .person_name_exists(&row.forename, &row.family_name, None)
            .await?
        {
            return Err(PersonError::DuplicateName(row.identity()));
        }

        // The store index also rejects duplicates, covering the window
        // between the check above and the insert.
        let identity = row.identity();
        self.store
            .add_person(row)
            .await?
            .ok_or(PersonError::DuplicateName(identity))
    }

    async fn update(&self, id: i32, input: PersonInput) -> Result<Person, PersonError> {
        let row = validate(input)?;

        if self
            .store
            .get_person(id)
            .await?
            .is_none()
        {
            return Err(PersonError::PersonNotFound);
        }

        if self
            .store
            .person_name_exists(&row.forename, &row.family_name, Some(id))
            .await?
        {
            return Err(PersonError::DuplicateName(row.identity()));
        }

        self.store
            .update_person(id, row)
            .await?
            .ok_or(PersonError::PersonNotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), PersonError> {
        let deleted = self.store.remove_person(id).await?;
        if !deleted {
            return Err(PersonError::PersonNotFound);
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[i32]) -> Result<u64, PersonError> {
        let removed = self.store.remove_people(ids).await?;
        Ok(removed)
    }
}
