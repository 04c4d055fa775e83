//! Push message model and FCM v1 wire serialization.

use indexmap::IndexMap;
use serde_json::{json, Value};

/// Web-push presentation hints carried alongside the notification.
#[derive(Debug, Clone, PartialEq)]
pub struct WebPushOptions {
    /// Delivery urgency header (`high` for reminders).
    pub urgency: String,
    /// De-duplication tag: the receiving client collapses notifications
    /// sharing a tag into one visible alert instead of stacking them.
    pub tag: String,
    /// Re-alert the user when a tagged notification is replaced.
    pub renotify: bool,
}

/// One push notification addressed to a single device token.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    /// Structured payload; FCM requires string values.
    pub data: IndexMap<String, String>,
    pub webpush: WebPushOptions,
}

impl PushMessage {
    /// Serialize to the FCM HTTP v1 request body
    /// (`projects.messages:send` wire shape).
    pub fn to_fcm_v1(&self) -> Value {
        json!({
            "message": {
                "token": self.token,
                "notification": {
                    "title": self.title,
                    "body": self.body,
                },
                "data": self.data,
                "webpush": {
                    "headers": { "Urgency": self.webpush.urgency },
                    "notification": {
                        "tag": self.webpush.tag,
                        "renotify": self.webpush.renotify,
                    },
                },
            }
        })
    }
}
