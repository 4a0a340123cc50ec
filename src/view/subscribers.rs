use serde::Serialize;

use crate::model::Subscriber;

/// Public response to a newsletter sign-up
#[derive(Debug, Serialize)]
pub struct SubscriberCreated {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<Subscriber> for SubscriberCreated {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            id: subscriber.id,
            email: subscriber.email,
            name: subscriber.name,
        }
    }
}
