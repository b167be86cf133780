use std::fmt::{self, Display};

// Helper macro to define string-backed identifier newtypes and common trait impls
macro_rules! define_key {
    ($name:ident $(, $extra:ident)*) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash $(, $extra)*)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_key!(UserId);
define_key!(ArtworkId, PartialOrd, Ord);

/// 用户 ID 是不透明的字符串，不做格式校验
impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// 作品 ID：去掉首尾空白后必须非空
impl TryFrom<&str> for ArtworkId {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(format!("invalid artwork id: {:?}", value));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ArtworkId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ArtworkId::try_from(value.as_str())
    }
}
