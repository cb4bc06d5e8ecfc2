//! Typed helpers for the school-management endpoints

use super::{ApiClient, ClientError};
use cbg_core::types::{BoardingStudent, Bed, Dormitory, Notification};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadUpdate {
    read: bool,
}

impl ApiClient {
    /// List boarding students
    pub async fn list_students(&self) -> Result<Vec<BoardingStudent>, ClientError> {
        self.get("/students").await
    }

    /// Get a single boarding student
    pub async fn get_student(&self, id: &str) -> Result<BoardingStudent, ClientError> {
        self.get(&format!("/students/{id}")).await
    }

    /// List dormitories with their beds
    pub async fn list_dormitories(&self) -> Result<Vec<Dormitory>, ClientError> {
        self.get("/dormitories").await
    }

    /// Get a single dormitory
    pub async fn get_dormitory(&self, id: &str) -> Result<Dormitory, ClientError> {
        self.get(&format!("/dormitories/{id}")).await
    }

    /// List the beds of a dormitory
    pub async fn list_beds(&self, dormitory_id: &str) -> Result<Vec<Bed>, ClientError> {
        self.get(&format!("/dormitories/{dormitory_id}/beds")).await
    }

    /// List notifications for the signed-in user, optionally only unread ones
    pub async fn list_notifications(
        &self,
        unread_only: bool,
    ) -> Result<Vec<Notification>, ClientError> {
        let mut request = self.request(Method::GET, "/notifications");
        if unread_only {
            request = request.query("unread", "true");
        }
        self.execute(request).await
    }

    /// Mark a notification as read
    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, ClientError> {
        self.patch(&format!("/notifications/{id}"), &ReadUpdate { read: true })
            .await
    }
}
