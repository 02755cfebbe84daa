//! User roles and profile records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KitabuError;

/// Account role; decides which dashboard a user sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Parent managing children's reading.
    Parent,
    /// Young reader.
    Child,
    /// Book author.
    Author,
}

impl Role {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Child => "child",
            Role::Author => "author",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = KitabuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Role::Parent),
            "child" => Ok(Role::Child),
            // "own" is what the web client calls the author role
            "author" | "own" => Ok(Role::Author),
            other => Err(KitabuError::Parse(format!("unknown role '{}'", other))),
        }
    }
}

/// Child entry listed on a parent's dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSummary {
    /// Child account id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Books finished.
    pub books_read: u32,
    /// Last activity date, `YYYY-MM-DD`.
    pub last_active: String,
}

/// Parent account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Linked children.
    #[serde(default)]
    pub children: Vec<ChildSummary>,
}

/// Child account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Reading level label.
    pub reading_level: String,
    /// Reward points.
    #[serde(default)]
    pub points: u32,
    /// Earned badges.
    #[serde(default)]
    pub badges: Vec<String>,
    /// Books finished.
    #[serde(default)]
    pub books_read: u32,
    /// Favourite category.
    #[serde(default)]
    pub favorite_category: Option<String>,
}

/// Author account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Number of published books.
    #[serde(default)]
    pub created_books: u32,
    /// Follower count.
    #[serde(default)]
    pub followers: u32,
}

/// Profile record of any role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    /// Parent profile.
    Parent(ParentProfile),
    /// Child profile.
    Child(ChildProfile),
    /// Author profile.
    Author(AuthorProfile),
}

impl Profile {
    /// Role of this profile.
    pub fn role(&self) -> Role {
        match self {
            Profile::Parent(_) => Role::Parent,
            Profile::Child(_) => Role::Child,
            Profile::Author(_) => Role::Author,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Profile::Parent(p) => &p.name,
            Profile::Child(c) => &c.name,
            Profile::Author(a) => &a.name,
        }
    }

    /// Contact email; children have none.
    pub fn email(&self) -> Option<&str> {
        match self {
            Profile::Parent(p) => Some(&p.email),
            Profile::Child(_) => None,
            Profile::Author(a) => Some(&a.email),
        }
    }
}
