//! Identity inventory (IAM users and their policy names).

use aws_config::SdkConfig;
use aws_sdk_iam::error::DisplayErrorContext;
use serde::Serialize;
use tracing::debug;

use super::FetchError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IamUserRecord {
    pub user_name: String,
    /// Attached policy names first, then inline. Duplicates retained: a
    /// policy listed in both categories shows up twice.
    pub policies: Vec<String>,
}

/// Lists every IAM user, then fetches attached and inline policy names per
/// user (two extra calls each).
pub async fn identity_inventory(cfg: &SdkConfig) -> Result<Vec<IamUserRecord>, FetchError> {
    let client = aws_sdk_iam::Client::new(cfg);
    let resp = client
        .list_users()
        .send()
        .await
        .map_err(|e| FetchError::Identity(format!("{}", DisplayErrorContext(&e))))?;

    let mut records = Vec::new();
    for user in resp.users() {
        let user_name = user.user_name().to_string();

        let attached_resp = client
            .list_attached_user_policies()
            .user_name(&user_name)
            .send()
            .await
            .map_err(|e| FetchError::Identity(format!("{}", DisplayErrorContext(&e))))?;
        let attached: Vec<String> = attached_resp
            .attached_policies()
            .iter()
            .filter_map(|p| p.policy_name())
            .map(str::to_string)
            .collect();

        let inline_resp = client
            .list_user_policies()
            .user_name(&user_name)
            .send()
            .await
            .map_err(|e| FetchError::Identity(format!("{}", DisplayErrorContext(&e))))?;
        let inline = inline_resp.policy_names().to_vec();

        records.push(IamUserRecord {
            user_name,
            policies: merge_policies(attached, inline),
        });
    }
    debug!(users = records.len(), "listed identity users");

    Ok(records)
}

/// Attached first, then inline. No dedup.
pub fn merge_policies(attached: Vec<String>, inline: Vec<String>) -> Vec<String> {
    let mut all = attached;
    all.extend(inline);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_then_inline_order() {
        let merged = merge_policies(
            vec!["ReadOnlyAccess".into(), "S3FullAccess".into()],
            vec!["inline-deploy".into()],
        );
        assert_eq!(merged, vec!["ReadOnlyAccess", "S3FullAccess", "inline-deploy"]);
    }

    #[test]
    fn duplicates_are_retained() {
        let merged = merge_policies(
            vec!["Shared".into(), "A".into()],
            vec!["Shared".into()],
        );
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], "Shared");
        assert_eq!(merged[2], "Shared");
    }

    #[test]
    fn empty_both_sides() {
        assert!(merge_policies(vec![], vec![]).is_empty());
    }
}
