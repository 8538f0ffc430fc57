//! The publishing roles a caller can claim within an organization.

use std::fmt;
use std::str::FromStr;

pub const INVALID_USER_TYPE: &str = "invalid user_type options are org,dept,teacher";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    /// Owner of the organization.
    Organization,
    /// Owner of exactly one live department of the organization.
    Department,
    /// Live teacher in a live department of the organization.
    Teacher,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Organization => "org",
            UserType::Department => "dept",
            UserType::Teacher => "teacher",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUserType(pub String);

impl fmt::Display for UnknownUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown user_type `{}`", self.0)
    }
}

impl std::error::Error for UnknownUserType {}

impl FromStr for UserType {
    type Err = UnknownUserType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "org" | "organization" => Ok(UserType::Organization),
            "dept" | "department" => Ok(UserType::Department),
            "teacher" => Ok(UserType::Teacher),
            other => Err(UnknownUserType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_short_and_long_names() {
        assert_eq!("org".parse(), Ok(UserType::Organization));
        assert_eq!("organization".parse(), Ok(UserType::Organization));
        assert_eq!("dept".parse(), Ok(UserType::Department));
        assert_eq!("department".parse(), Ok(UserType::Department));
        assert_eq!("teacher".parse(), Ok(UserType::Teacher));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Teacher".parse::<UserType>().is_err());
        assert!("student".parse::<UserType>().is_err());
        assert!("".parse::<UserType>().is_err());
    }
}
