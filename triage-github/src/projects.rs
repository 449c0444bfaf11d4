//! GitHub Projects (v2) operations

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use triage_core::{
    LinkedItem, ProjectBoard, ProjectId, ProjectReference, RemoteResult, StatusFieldState,
    StatusOption, StatusUpdate,
};

use crate::{Error, GitHubClient, Result};

/// Name of the single-select field the workflow reads and writes
const STATUS_FIELD: &str = "Status";

/// Upper bound on project items fetched per issue or pull request
const MAX_LINKED_ITEMS: u32 = 100;

const LINKED_ITEMS_QUERY: &str = r#"
    query($nodeId: ID!, $first: Int!, $field: String!) {
        node(id: $nodeId) {
            ... on Issue {
                projectItems(first: $first) { ...linkedItems }
            }
            ... on PullRequest {
                projectItems(first: $first) { ...linkedItems }
            }
        }
    }

    fragment linkedItems on ProjectV2ItemConnection {
        nodes {
            id
            project { id }
            fieldValueByName(name: $field) {
                ... on ProjectV2ItemFieldSingleSelectValue {
                    name
                    field {
                        ... on ProjectV2SingleSelectField {
                            id
                            options { id name }
                        }
                    }
                }
            }
        }
    }
"#;

const UPDATE_STATUS_MUTATION: &str = r#"
    mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!, $field: String!) {
        updateProjectV2ItemFieldValue(
            input: {
                projectId: $projectId
                itemId: $itemId
                fieldId: $fieldId
                value: { singleSelectOptionId: $optionId }
            }
        ) {
            projectV2Item {
                id
                fieldValueByName(name: $field) {
                    ... on ProjectV2ItemFieldSingleSelectValue {
                        name
                    }
                }
            }
        }
    }
"#;

/// Project lookup, with the owner aliased so both owner kinds share a shape
fn project_id_query(project: &ProjectReference) -> String {
    format!(
        r#"
    query($owner: String!, $number: Int!) {{
        owner: {}(login: $owner) {{
            projectV2(number: $number) {{
                id
            }}
        }}
    }}
"#,
        project.owner_type.graphql_field()
    )
}

#[derive(Debug, Deserialize)]
struct ProjectOwnerData {
    owner: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectOwner {
    project_v2: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
struct IdNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct LinkedItemsData {
    node: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentNode {
    /// Absent when the node is neither an issue nor a pull request
    #[serde(default)]
    project_items: Option<ItemConnection>,
}

#[derive(Debug, Deserialize)]
struct ItemConnection {
    nodes: Vec<Option<ItemNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNode {
    id: String,
    project: IdNode,
    field_value_by_name: Option<SingleSelectValue>,
}

/// Empty object when the value is not a single-select value
#[derive(Debug, Default, Deserialize)]
struct SingleSelectValue {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    field: Option<SingleSelectField>,
}

#[derive(Debug, Deserialize)]
struct SingleSelectField {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    options: Vec<OptionNode>,
}

#[derive(Debug, Deserialize)]
struct OptionNode {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusData {
    update_project_v2_item_field_value: Option<UpdatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePayload {
    project_v2_item: Option<UpdatedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedItem {
    id: String,
    field_value_by_name: Option<SingleSelectValue>,
}

impl From<ItemNode> for LinkedItem {
    fn from(node: ItemNode) -> Self {
        let status = node.field_value_by_name.and_then(|value| {
            let field = value.field?;
            Some(StatusFieldState {
                status_name: value.name?,
                field_id: field.id?,
                options: field
                    .options
                    .into_iter()
                    .map(|o| StatusOption {
                        id: o.id,
                        name: o.name,
                    })
                    .collect(),
            })
        });

        LinkedItem {
            item_id: node.id,
            project_id: ProjectId::new(node.project.id),
            status,
        }
    }
}

impl GitHubClient {
    /// Resolve the opaque id of a project board
    pub async fn get_project_id(&self, project: &ProjectReference) -> Result<ProjectId> {
        debug!(%project, "Resolving project id");

        let variables = json!({
            "owner": project.owner_name,
            "number": project.project_number,
        });

        let data: ProjectOwnerData = self
            .graphql_query(&project_id_query(project), &variables)
            .await?;

        data.owner
            .and_then(|o| o.project_v2)
            .map(|p| ProjectId::new(p.id))
            .ok_or_else(|| Error::MissingData(format!("{} not found", project)))
    }

    /// Fetch the project items an issue or pull request is linked to
    pub async fn get_linked_items(&self, node_id: &str) -> Result<Vec<LinkedItem>> {
        debug!(node_id, "Fetching linked project items");

        let variables = json!({
            "nodeId": node_id,
            "first": MAX_LINKED_ITEMS,
            "field": STATUS_FIELD,
        });

        let data: LinkedItemsData = self.graphql_query(LINKED_ITEMS_QUERY, &variables).await?;

        let node = data
            .node
            .ok_or_else(|| Error::MissingData(format!("Node {} not found", node_id)))?;

        let items: Vec<LinkedItem> = node
            .project_items
            .map(|c| c.nodes.into_iter().flatten().map(LinkedItem::from).collect())
            .unwrap_or_default();

        debug!(node_id, count = items.len(), "Fetched linked project items");
        Ok(items)
    }

    /// Set the Status field of a project item
    ///
    /// Returns the Status value name reported after the update.
    pub async fn set_status(&self, update: &StatusUpdate) -> Result<String> {
        debug!(
            project_id = %update.project_id,
            item_id = %update.item_id,
            value = %update.value,
            "Updating status"
        );

        let variables = json!({
            "projectId": update.project_id.as_str(),
            "itemId": update.item_id,
            "fieldId": update.field_id,
            "optionId": update.option_id,
            "field": STATUS_FIELD,
        });

        let data: UpdateStatusData = self
            .graphql_query(UPDATE_STATUS_MUTATION, &variables)
            .await?;

        let item = data
            .update_project_v2_item_field_value
            .and_then(|p| p.project_v2_item)
            .ok_or_else(|| Error::MissingData("Mutation returned no project item".to_string()))?;

        item.field_value_by_name
            .and_then(|v| v.name)
            .ok_or_else(|| {
                Error::MissingData(format!("Item {} has no Status value after update", item.id))
            })
    }
}

#[async_trait]
impl ProjectBoard for GitHubClient {
    async fn project_id(&self, project: &ProjectReference) -> RemoteResult<ProjectId> {
        Ok(self.get_project_id(project).await?)
    }

    async fn linked_items(&self, node_id: &str) -> RemoteResult<Vec<LinkedItem>> {
        Ok(self.get_linked_items(node_id).await?)
    }

    async fn update_status(&self, update: &StatusUpdate) -> RemoteResult<String> {
        Ok(self.set_status(update).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use triage_core::GitHubConfig;

    fn client_for(server: &mockito::ServerGuard) -> GitHubClient {
        let config = GitHubConfig {
            api_url: format!("{}/graphql", server.url()),
            ..GitHubConfig::default()
        };
        GitHubClient::new("ghp_test", &config).unwrap()
    }

    #[test]
    fn test_project_query_uses_owner_field() {
        let org = ProjectReference::parse("github.com/orgs/acme/projects/7").unwrap();
        assert!(project_id_query(&org).contains("owner: organization(login: $owner)"));

        let user = ProjectReference::parse("github.com/users/jdoe/projects/3").unwrap();
        assert!(project_id_query(&user).contains("owner: user(login: $owner)"));
    }

    #[tokio::test]
    async fn test_get_project_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r"organization\(login".to_string()),
                Matcher::PartialJson(json!({ "variables": { "owner": "acme", "number": 7 } })),
            ]))
            .with_status(200)
            .with_body(r#"{"data":{"owner":{"projectV2":{"id":"PVT_kwDOA"}}}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let project = ProjectReference::parse("https://github.com/orgs/acme/projects/7").unwrap();
        let id = client.project_id(&project).await.unwrap();

        assert_eq!(id, ProjectId::new("PVT_kwDOA"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_project_id_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":{"owner":{"projectV2":null}}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let project = ProjectReference::parse("github.com/users/jdoe/projects/3").unwrap();
        let err = client.project_id(&project).await.unwrap_err();

        assert_eq!(err.to_string(), "user jdoe project #3 not found");
    }

    #[tokio::test]
    async fn test_get_linked_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "nodeId": "I_kwDOissue", "field": "Status" }
            })))
            .with_status(200)
            .with_body(
                r#"{"data":{"node":{"projectItems":{"nodes":[
                    {
                        "id": "PVTI_1",
                        "project": { "id": "PVT_kwDOA" },
                        "fieldValueByName": {
                            "name": "Todo",
                            "field": {
                                "id": "PVTSSF_status",
                                "options": [
                                    { "id": "f75ad846", "name": "Todo" },
                                    { "id": "47fc9ee4", "name": "In Progress" }
                                ]
                            }
                        }
                    },
                    {
                        "id": "PVTI_2",
                        "project": { "id": "PVT_other" },
                        "fieldValueByName": null
                    }
                ]}}}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let items = client.linked_items("I_kwDOissue").await.unwrap();

        assert_eq!(items.len(), 2);
        let status = items[0].status.as_ref().unwrap();
        assert_eq!(items[0].item_id, "PVTI_1");
        assert_eq!(items[0].project_id, ProjectId::new("PVT_kwDOA"));
        assert_eq!(status.status_name, "Todo");
        assert_eq!(status.field_id, "PVTSSF_status");
        assert_eq!(status.option_id("In Progress"), Some("47fc9ee4"));
        assert!(items[1].status.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_linked_items_for_other_node_type_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":{"node":{}}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.linked_items("D_discussion").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_linked_items_unknown_node() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":{"node":null}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.linked_items("I_gone").await.unwrap_err();
        assert!(err.to_string().contains("I_gone"));
    }

    #[tokio::test]
    async fn test_non_single_select_value_has_no_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(
                r#"{"data":{"node":{"projectItems":{"nodes":[
                    { "id": "PVTI_1", "project": { "id": "PVT_1" }, "fieldValueByName": {} }
                ]}}}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let items = client.linked_items("I_1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].status.is_none());
    }

    #[tokio::test]
    async fn test_set_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("updateProjectV2ItemFieldValue".to_string()),
                Matcher::PartialJson(json!({
                    "variables": {
                        "projectId": "PVT_kwDOA",
                        "itemId": "PVTI_1",
                        "fieldId": "PVTSSF_status",
                        "optionId": "47fc9ee4"
                    }
                })),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data":{"updateProjectV2ItemFieldValue":{"projectV2Item":{
                    "id": "PVTI_1",
                    "fieldValueByName": { "name": "In Progress" }
                }}}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let update = StatusUpdate {
            project_id: ProjectId::new("PVT_kwDOA"),
            item_id: "PVTI_1".to_string(),
            field_id: "PVTSSF_status".to_string(),
            option_id: "47fc9ee4".to_string(),
            value: "In Progress".to_string(),
        };
        let name = client.update_status(&update).await.unwrap();

        assert_eq!(name, "In Progress");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_status_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(
                r#"{"data":{"updateProjectV2ItemFieldValue":null},
                    "errors":[{"message":"The single select option Id does not belong to the field"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let update = StatusUpdate {
            project_id: ProjectId::new("PVT_kwDOA"),
            item_id: "PVTI_1".to_string(),
            field_id: "PVTSSF_status".to_string(),
            option_id: "bogus".to_string(),
            value: "Bogus".to_string(),
        };
        let err = client.update_status(&update).await.unwrap_err();
        assert!(err.to_string().contains("does not belong to the field"));
    }
}
