//! # Target Group ARN
//!
//! Identifier of the registration group. The persisted state's `id` is this
//! value, so reads and imports key off it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TARGET_GROUP_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:aws[a-z-]*:elasticloadbalancing:[a-z0-9-]+:\d{12}:targetgroup/[A-Za-z0-9-]{1,32}/[0-9a-f]{16}$",
    )
    .expect("target group ARN pattern is a valid regex")
});

/// Validated target group ARN
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetGroupArn(String);

/// Error returned for a malformed target group ARN
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target group ARN {0:?}: expected arn:<partition>:elasticloadbalancing:<region>:<account>:targetgroup/<name>/<id>")]
pub struct InvalidArn(pub String);

impl TargetGroupArn {
    pub fn parse(value: &str) -> Result<Self, InvalidArn> {
        let trimmed = value.trim();
        if TARGET_GROUP_ARN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidArn(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Target group name segment of the ARN
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .rsplit('/')
            .nth(1)
            .unwrap_or_default()
    }

    /// Region segment of the ARN
    #[must_use]
    pub fn region(&self) -> &str {
        self.0.split(':').nth(3).unwrap_or_default()
    }
}

impl FromStr for TargetGroupArn {
    type Err = InvalidArn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TargetGroupArn {
    type Error = InvalidArn;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TargetGroupArn> for String {
    fn from(value: TargetGroupArn) -> Self {
        value.0
    }
}

impl fmt::Display for TargetGroupArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
