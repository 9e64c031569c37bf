// ABOUTME: Permission error record describing a rejected document store access
// ABOUTME: Carries the path, operation and attempted data for listeners and debugging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store operation that was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOperation {
    /// Document creation
    Create,
    /// Document update
    Update,
    /// Document deletion
    Delete,
    /// Single document read
    Get,
    /// Collection query or subscription
    List,
    /// Unspecified write
    Write,
}

impl WriteOperation {
    /// Lowercase operation name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Get => "get",
            Self::List => "list",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context for an access the store refused
///
/// Published on the permission error channel so any interested component can
/// surface it; the message is what the user sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionError {
    /// Collection or document path the operation targeted
    pub path: String,
    /// Attempted operation
    pub operation: WriteOperation,
    /// Data the caller tried to write, when there was any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_resource_data: Option<Value>,
    /// Human-readable description
    pub message: String,
    /// Authenticated user who attempted the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<String>,
}

impl PermissionError {
    /// Build a permission error with a message derived from the path and operation
    #[must_use]
    pub fn new(path: impl Into<String>, operation: WriteOperation) -> Self {
        let path = path.into();
        let message = format!("Missing or insufficient permissions: {operation} on {path}");
        Self {
            path,
            operation,
            request_resource_data: None,
            message,
            auth_user_id: None,
        }
    }

    /// Attach the data the caller attempted to write
    #[must_use]
    pub fn with_resource_data(mut self, data: Value) -> Self {
        self.request_resource_data = Some(data);
        self
    }

    /// Attach the acting user
    #[must_use]
    pub fn with_auth_user(mut self, user_id: impl Into<String>) -> Self {
        self.auth_user_id = Some(user_id.into());
        self
    }

    /// Replace the derived message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PermissionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let error = PermissionError::new("users/u1/workouts", WriteOperation::Create)
            .with_resource_data(json!({ "name": "Leg Day" }))
            .with_auth_user("u2");

        let value = serde_json::to_value(&error).unwrap_or_default();
        assert_eq!(value["operation"], "create");
        assert_eq!(value["authUserId"], "u2");
        assert_eq!(value["requestResourceData"]["name"], "Leg Day");
        assert_eq!(
            value["message"],
            "Missing or insufficient permissions: create on users/u1/workouts"
        );
    }
}
