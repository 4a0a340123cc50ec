use actix_web::dev::HttpServiceFactory;
use actix_web::{post, web, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::domain::{EmailAddress, PersonName};
use crate::error::{unique_violation, RestError, RestResult, ValidationErrors};
use crate::model::NewSubscriber;
use crate::repo::SubscriberRepo;
use crate::view::SubscriberCreated;

const DUPLICATE_EMAIL: &str = "subscriber with this email already exists.";
const REQUIRED: &str = "This field is required.";

/// JSON body of a newsletter sign-up
#[derive(Debug, Deserialize)]
pub struct NewSubscriberBody {
    email: Option<String>,
    name: Option<String>,
}

impl TryFrom<NewSubscriberBody> for NewSubscriber {
    type Error = ValidationErrors;

    fn try_from(body: NewSubscriberBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let email = match body.email.as_deref() {
            Some(email) => errors.check("email", email.parse::<EmailAddress>()),
            None => {
                errors.add("email", REQUIRED);
                None
            }
        };
        let name = errors.check("name", PersonName::parse_optional(body.name.as_deref()));

        errors.finish()?;
        match (email, name) {
            (Some(email), Some(name)) => Ok(Self { email, name }),
            _ => Err(ValidationErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

/// Sign up for the newsletter
#[tracing::instrument(name = "Create a new subscriber", skip(pool))]
#[post("/")]
async fn create(
    pool: web::Data<PgPool>,
    body: web::Json<NewSubscriberBody>,
) -> RestResult<impl Responder> {
    let new_subscriber: NewSubscriber = body.into_inner().try_into()?;

    let subscriber = SubscriberRepo::insert(pool.get_ref(), &new_subscriber)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => RestError::invalid("email", DUPLICATE_EMAIL),
            None => e.into(),
        })?;

    Ok(HttpResponse::Created().json(SubscriberCreated::from(subscriber)))
}

/// Newsletter API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscribe").service(create)
}
