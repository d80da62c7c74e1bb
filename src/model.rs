//! User records and the in-memory working set backing the table.
//!
//! Records arrive from the users endpoint or are created locally through the
//! form. Nothing here is persisted; the working set lives as long as the
//! running screen.
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Identifier of a user record.
///
/// The endpoint assigns numeric ids; records created locally get a UUID string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// A fresh random identifier for a locally created record.
    pub fn generate() -> Self {
        UserId::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Number(n)
    }
}

impl From<i32> for UserId {
    fn from(n: i32) -> Self {
        UserId::Number(n.into())
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

/// A single user as shown in the table.
///
/// Only `id`, `name` and `email` are kept; any other field the endpoint sends
/// is ignored on decode.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Derived username: `name` immediately followed by `id`.
    pub fn username(&self) -> String {
        format!("{}{}", self.name, self.id)
    }
}

/// Ordered collection of records, unique by id.
#[derive(Clone, Debug, Default)]
pub struct WorkingSet {
    records: Vec<UserRecord>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains_id(&self, id: &UserId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole set, as done once when the fetch resolves.
    pub fn replace_all(&mut self, records: Vec<UserRecord>) {
        self.records = records;
    }

    /// Insert a record as the first row.
    pub fn prepend(&mut self, record: UserRecord) {
        self.records.insert(0, record);
    }

    /// Apply `update` to the record with `id`. Returns false if no record matched.
    pub fn update_by_id<F>(&mut self, id: &UserId, update: F) -> bool
    where
        F: FnOnce(&mut UserRecord),
    {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(record) => {
                update(record);
                true
            }
            None => false,
        }
    }

    /// Generate an id not already used by any record in the set.
    pub fn fresh_id(&self) -> UserId {
        loop {
            let id = UserId::generate();
            if !self.contains_id(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_concatenates_name_and_id() {
        let r = UserRecord::new(7, "Ann", "a@x.com");
        assert_eq!(r.username(), "Ann7");
        let r = UserRecord::new("abc", "Bo", "b@x.com");
        assert_eq!(r.username(), "Boabc");
    }

    #[test]
    fn id_decodes_from_number_or_string() {
        let n: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(n, UserId::Number(42));
        let s: UserId = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(s, UserId::Text("u-1".into()));
    }

    #[test]
    fn update_by_id_touches_only_the_matching_record() {
        let mut set = WorkingSet::from_records(vec![
            UserRecord::new(1, "Ann", "a@x.com"),
            UserRecord::new(2, "Bob", "b@x.com"),
        ]);
        assert!(set.update_by_id(&UserId::Number(2), |r| r.email = "new@x.com".into()));
        assert_eq!(set.records()[0].email, "a@x.com");
        assert_eq!(set.records()[1].email, "new@x.com");
        assert!(!set.update_by_id(&UserId::Number(9), |r| r.name.clear()));
    }

    #[test]
    fn fresh_id_is_not_in_the_set() {
        let set = WorkingSet::from_records(vec![UserRecord::new(1, "Ann", "a@x.com")]);
        let id = set.fresh_id();
        assert!(!set.contains_id(&id));
        assert!(matches!(id, UserId::Text(_)));
    }
}
