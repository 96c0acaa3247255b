use chrono::{DateTime, Utc};
use qb_form::{Field, FormRecord, Password, Schema, WidgetKind};
use serde::{Deserialize, Serialize};

use crate::validators::PASSWORD;

/// A silly thing somebody said.
///
/// JSON keys keep the names used by existing quote files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "WhoSaidTheSillyThing")]
    pub who_said_the_silly_thing: String,
    #[serde(rename = "WhatSillyThingDidTheySay")]
    pub what_silly_thing_did_they_say: String,
}

impl FormRecord for Quote {
    fn schema() -> Schema<Self> {
        Schema::builder()
            .field(Field::new("Time", |q: &Quote| &q.time, |q: &mut Quote, v| q.time = v).suppressed())
            .field(
                Field::new(
                    "WhoSaidTheSillyThing",
                    |q: &Quote| &q.who_said_the_silly_thing,
                    |q: &mut Quote, v| q.who_said_the_silly_thing = v,
                )
                .label("Who said the silly thing?"),
            )
            .field(
                Field::new(
                    "WhatSillyThingDidTheySay",
                    |q: &Quote| &q.what_silly_thing_did_they_say,
                    |q: &mut Quote, v| q.what_silly_thing_did_they_say = v,
                )
                .label("What silly thing did they say?")
                .widget(WidgetKind::TextArea),
            )
            .build()
    }
}

/// The "add a quote" form: a quote plus the shared password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddQuoteForm {
    pub quote: Quote,
    pub what_is_the_password: Password,
}

impl FormRecord for AddQuoteForm {
    fn schema() -> Schema<Self> {
        Schema::builder()
            .embed(
                Quote::schema(),
                |form: &AddQuoteForm| &form.quote,
                |form: &mut AddQuoteForm| &mut form.quote,
            )
            .field(
                Field::new(
                    "WhatIsThePassword",
                    |form: &AddQuoteForm| &form.what_is_the_password,
                    |form: &mut AddQuoteForm, v| form.what_is_the_password = v,
                )
                .label("What is the password?")
                .help("If you don't know this, then you don't belong here.")
                .validator(PASSWORD),
            )
            .build()
    }
}

impl AddQuoteForm {
    /// Stamp the quote with `time` and hand it over for storage.
    #[must_use]
    pub fn into_quote(self, time: DateTime<Utc>) -> Quote {
        Quote { time, ..self.quote }
    }
}
