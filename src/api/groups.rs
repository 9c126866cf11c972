//! `/api/groups`

use super::client::{decode_list, seg, ApiClient};
use crate::error::AppResult;
use crate::models::{CreateGroupRequest, Group, UpdateGroupRequest};

impl ApiClient {
    pub async fn list_groups(&self) -> AppResult<Vec<Group>> {
        let response = self.get_raw("/api/groups").await?;
        decode_list(&response, &["groups"])
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> AppResult<Group> {
        self.post_json("/api/groups", request).await
    }

    pub async fn get_group(&self, group_id: &str) -> AppResult<Group> {
        self.get_json(&format!("/api/groups/{}", seg(group_id))).await
    }

    pub async fn update_group(&self, group_id: &str, request: &UpdateGroupRequest) -> AppResult<Group> {
        self.put_json(&format!("/api/groups/{}", seg(group_id)), request)
            .await
    }

    pub async fn delete_group(&self, group_id: &str) -> AppResult<()> {
        self.delete(&format!("/api/groups/{}", seg(group_id))).await
    }
}
