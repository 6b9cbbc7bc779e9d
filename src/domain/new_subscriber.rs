use actix_web::web;
use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

#[derive(Deserialize)]
pub struct NewSubscriberBody {
    // Option so that an absent or null email reaches the presence check
    // instead of being rejected by the deserializer
    pub email: Option<String>,
}

impl TryFrom<web::Json<NewSubscriberBody>> for NewSubscriber {
    type Error = String;

    fn try_from(body: web::Json<NewSubscriberBody>) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email.clone().unwrap_or_default())?;

        Ok(NewSubscriber { email })
    }
}
