pub type UserId = u64;

/// One user as returned by the directory API. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    FirstName,
    LastName,
    Email,
}

impl SortKey {
    pub fn field(self, record: &UserRecord) -> &str {
        match self {
            SortKey::FirstName => &record.first_name,
            SortKey::LastName => &record.last_name,
            SortKey::Email => &record.email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    #[default]
    All,
    GmailOnly,
    FirstLetterA,
}

impl FilterKind {
    pub fn accepts(self, record: &UserRecord) -> bool {
        match self {
            FilterKind::All => true,
            FilterKind::GmailOnly => record.email.to_lowercase().ends_with("@gmail.com"),
            FilterKind::FirstLetterA => record.first_name.to_lowercase().starts_with('a'),
        }
    }
}
