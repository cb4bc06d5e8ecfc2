//! Data contracts exchanged with the CBG Connect API
//!
//! These mirror the JSON the backend produces. They carry no business rules;
//! bed assignment and notification delivery happen server side.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

/// A student living in school boarding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardingStudent {
    pub id: String,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Class or form, e.g. "Form 3"
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub dormitory_id: Option<String>,
    #[serde(default)]
    pub dormitory_name: Option<String>,
    #[serde(default)]
    pub bed_id: Option<String>,
    #[serde(default)]
    pub bed_number: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StudentStatus,
}

impl BoardingStudent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the student currently holds a bed
    pub fn has_bed(&self) -> bool {
        self.bed_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BedStatus {
    #[default]
    Vacant,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    pub id: String,
    pub bed_number: String,
    #[serde(default)]
    pub dormitory_id: Option<String>,
    #[serde(default)]
    pub status: BedStatus,
    #[serde(default)]
    pub students: Vec<BoardingStudent>,
}

impl Bed {
    pub fn is_available(&self) -> bool {
        self.status == BedStatus::Vacant
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dormitory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub capacity: u32,
    #[serde(default)]
    pub current_occupancy: u32,
    #[serde(default)]
    pub house_master: Option<String>,
    #[serde(default)]
    pub beds: Vec<Bed>,
}

impl Dormitory {
    /// Free places, never negative even if the backend reports overbooking
    pub fn available_places(&self) -> u32 {
        self.capacity.saturating_sub(self.current_occupancy)
    }

    pub fn is_full(&self) -> bool {
        self.available_places() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Success,
    Error,
    Reminder,
}

/// Audience a notification is addressed to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetRole {
    #[default]
    All,
    Admin,
    Teacher,
    Student,
    Parent,
    Staff,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Academic,
    Boarding,
    Finance,
    Event,
    System,
    #[default]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    #[serde(default)]
    pub target_role: TargetRole,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub read: bool,
    /// Route or URL the UI opens when the notification is clicked
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub category: NotificationCategory,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_from_api_json() {
        let student: BoardingStudent = serde_json::from_value(json!({
            "id": "s-1",
            "admissionNumber": "CBG/2024/001",
            "firstName": "Amani",
            "lastName": "Otieno",
            "className": "Form 3",
            "dormitoryId": "d-1",
            "bedId": "b-4",
            "admissionDate": "2024-01-08",
            "status": "graduated"
        }))
        .unwrap();

        assert_eq!(student.full_name(), "Amani Otieno");
        assert_eq!(student.status, StudentStatus::Graduated);
        assert!(student.has_bed());
        assert_eq!(student.email, None);
    }

    #[test]
    fn test_dormitory_places() {
        let dorm: Dormitory = serde_json::from_value(json!({
            "id": "d-1",
            "name": "Kilimanjaro",
            "capacity": 2,
            "currentOccupancy": 3,
            "beds": [
                { "id": "b-1", "bedNumber": "A1", "status": "occupied" },
                { "id": "b-2", "bedNumber": "A2", "status": "maintenance" }
            ]
        }))
        .unwrap();

        assert_eq!(dorm.available_places(), 0);
        assert!(dorm.is_full());
        assert!(dorm.beds.iter().all(|bed| !bed.is_available()));
    }

    #[test]
    fn test_notification_type_field() {
        let notification: Notification = serde_json::from_value(json!({
            "id": "n-1",
            "title": "Lights out",
            "message": "Dorm inspection at 21:00",
            "type": "reminder",
            "targetRole": "student",
            "priority": "high",
            "category": "boarding",
            "createdAt": "2024-03-01T18:00:00Z"
        }))
        .unwrap();

        assert_eq!(notification.kind, NotificationType::Reminder);
        assert_eq!(notification.target_role, TargetRole::Student);
        assert!(!notification.read);
        assert!(notification.priority > Priority::Medium);

        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "reminder");
        assert_eq!(value["actionUrl"], serde_json::Value::Null);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<Bed>(json!({
            "id": "b-1",
            "bedNumber": "A1",
            "status": "broken"
        }));
        assert!(result.is_err());
    }
}
