//! Broker publishing
//!
//! Events are forwarded to a message broker through the fire-and-forget
//! [`Publisher`] capability. Delivery is the publisher's business; the
//! classifier never waits for or checks an acknowledgement.

use core::fmt::Write;

use heapless::String;

use crate::event::Event;

/// Topic receiving lightning distance reports
pub const TOPIC_LIGHTNING: &str = "ThunderSystem/alert/lightning";

/// Topic receiving noise level warnings
pub const TOPIC_NOISE: &str = "ThunderSystem/as3935/noise";

/// Topic receiving disturber notifications
pub const TOPIC_INTERFERENCE: &str = "ThunderSystem/as3935/interference";

/// Payload published on [`TOPIC_NOISE`]
pub const NOISE_PAYLOAD: &str = "noise";

/// Payload published on [`TOPIC_INTERFERENCE`]
pub const INTERFERENCE_PAYLOAD: &str = "interference";

/// Fire-and-forget message publishing.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &str);
}

/// Publishing disabled.
impl Publisher for () {
    fn publish(&mut self, _topic: &str, _payload: &str) {}
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, topic: &str, payload: &str) {
        (**self).publish(topic, payload)
    }
}

/// Forwards a classified event to its topic.
///
/// Lightning is published as the distance in kilometers, `-1` when out of
/// range. Unknown events are not published.
pub fn publish_event<P: Publisher + ?Sized>(publisher: &mut P, event: &Event) {
    match event {
        Event::NoiseHigh => publisher.publish(TOPIC_NOISE, NOISE_PAYLOAD),
        Event::Disturber { .. } => publisher.publish(TOPIC_INTERFERENCE, INTERFERENCE_PAYLOAD),
        Event::Lightning { distance, .. } => {
            let mut payload: String<8> = String::new();
            if write!(payload, "{}", distance.as_km()).is_ok() {
                publisher.publish(TOPIC_LIGHTNING, &payload);
            }
        }
        Event::Unknown { .. } => {}
    }
}
