//! Ordered keyword rules and the answers they produce
//!
//! Order matters: a question matching several rules is answered by the
//! earliest one.

use domain::{TemperatureBand, WeatherReading};

use super::ResponseTopic;

/// One keyword rule
pub(super) struct ResponseRule {
    pub topic: ResponseTopic,
    pub keywords: &'static [&'static str],
    pub builder: fn(&WeatherReading) -> String,
}

pub(super) static RESPONSE_RULES: &[ResponseRule] = &[
    ResponseRule {
        topic: ResponseTopic::Temperature,
        keywords: &["temperature", "hot", "cold"],
        builder: temperature_response,
    },
    ResponseRule {
        topic: ResponseTopic::Humidity,
        keywords: &["humid"],
        builder: humidity_response,
    },
    ResponseRule {
        topic: ResponseTopic::Wind,
        keywords: &["wind"],
        builder: wind_response,
    },
    ResponseRule {
        topic: ResponseTopic::Precipitation,
        keywords: &["rain", "precipitation"],
        builder: precipitation_response,
    },
    ResponseRule {
        topic: ResponseTopic::Clothing,
        keywords: &["wear", "clothes", "dress"],
        builder: clothing_response,
    },
];

fn temperature_response(reading: &WeatherReading) -> String {
    format!(
        "The temperature in {} is {}°C.",
        reading.city(),
        reading.temperature()
    )
}

fn humidity_response(reading: &WeatherReading) -> String {
    format!(
        "The humidity level is currently {}%.",
        reading.humidity().value()
    )
}

fn wind_response(reading: &WeatherReading) -> String {
    format!(
        "The wind speed is {} kilometers per hour.",
        reading.wind_speed()
    )
}

fn precipitation_response(reading: &WeatherReading) -> String {
    if reading.has_precipitation() {
        format!(
            "There is currently {} mm of precipitation.",
            reading.precipitation_or_zero()
        )
    } else {
        "There is no precipitation at the moment.".to_string()
    }
}

fn clothing_response(reading: &WeatherReading) -> String {
    let mut advice = format!("For today, {}", clothing_advice(reading.temperature_band()));
    if reading.has_precipitation() {
        advice.push_str(" Don't forget your umbrella, there's precipitation!");
    }
    advice
}

const fn clothing_advice(band: TemperatureBand) -> &'static str {
    match band {
        TemperatureBand::VeryCold => {
            "it's very cold. I recommend wearing a thick coat, scarf, gloves, and a hat."
        },
        TemperatureBand::Cool => {
            "it's cool. I recommend wearing a light coat or jacket and a sweater."
        },
        TemperatureBand::Pleasant => {
            "the temperature is pleasant. A sweater or light jacket should be enough."
        },
        TemperatureBand::Nice => "it's nice. A t-shirt and possibly a light layer for the evening.",
        TemperatureBand::Hot => {
            "it's hot. Light clothing is recommended, and don't forget sun protection!"
        },
    }
}

/// Answer used when no keyword matches
pub(super) fn summary_response(reading: &WeatherReading) -> String {
    format!(
        "In {}, it's currently {}°C with {}. The humidity is {}% and the wind is blowing at {} km/h.",
        reading.city(),
        reading.temperature(),
        reading.description(),
        reading.humidity().value(),
        reading.wind_speed()
    )
}
