use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// UUIDをラップした識別子型を定義する
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// 著者ID
    AuthorId
);
entity_id!(
    /// 書籍ID
    BookId
);
entity_id!(
    /// 会員ID
    MemberId
);
entity_id!(
    /// 貸出ID - 書籍と会員を結ぶ貸出レコードの識別子
    LoanId
);

/// 書籍のジャンル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "fiction")]
    Fiction,
    #[serde(rename = "nonfiction")]
    NonFiction,
    #[serde(rename = "sci-fi")]
    SciFi,
    #[serde(rename = "biography")]
    Biography,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "fiction",
            Genre::NonFiction => "nonfiction",
            Genre::SciFi => "sci-fi",
            Genre::Biography => "biography",
        }
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiction" => Ok(Genre::Fiction),
            "nonfiction" => Ok(Genre::NonFiction),
            "sci-fi" => Ok(Genre::SciFi),
            "biography" => Ok(Genre::Biography),
            _ => Err(format!("Invalid genre: {}", s)),
        }
    }
}

/// 延長日数エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionDaysError {
    /// 0以下の日数は延長として扱わない
    NotPositive,
}

/// 返却期限の延長日数
///
/// 不変条件：1日以上。返却期限を前倒しする延長は存在しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionDays(u32);

impl ExtensionDays {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for ExtensionDays {
    type Error = ExtensionDaysError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ExtensionDaysError::NotPositive);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ExtensionDaysError::NotPositive)
    }
}
