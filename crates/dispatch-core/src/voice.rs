//! Voice prompt generation
//!
//! When the voice provider connects the call it fetches the callback URL built
//! by intake; the handler answers with TwiML produced here.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

/// Stand-in for a missing patient id.
pub const UNKNOWN_PATIENT: &str = "unknown";

const SAY_VOICE: &str = "alice";
const SAY_LANGUAGE: &str = "en-US";

/// Spoken text for one patient. The id is stated, then repeated for a
/// listener who picked up mid-sentence.
pub fn render_prompt(patient_id: Option<&str>) -> String {
    let id = patient_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_PATIENT);

    format!(
        "This is an emergency alert from LifeConnect. Patient {id} needs immediate assistance. \
         Please check your text messages for the location. \
         Repeating: patient {id} needs immediate assistance."
    )
}

/// Wrap `prompt` in a TwiML `<Response><Say>` document.
pub fn render_voice_response(prompt: &str) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::Markup(e.to_string()))?;

    writer
        .write_event(Event::Start(BytesStart::new("Response")))
        .map_err(|e| Error::Markup(e.to_string()))?;

    let mut say = BytesStart::new("Say");
    say.push_attribute(("voice", SAY_VOICE));
    say.push_attribute(("language", SAY_LANGUAGE));
    writer
        .write_event(Event::Start(say))
        .map_err(|e| Error::Markup(e.to_string()))?;
    writer
        .write_event(Event::Text(BytesText::new(prompt)))
        .map_err(|e| Error::Markup(e.to_string()))?;
    writer
        .write_event(Event::End(BytesStart::new("Say").to_end()))
        .map_err(|e| Error::Markup(e.to_string()))?;

    writer
        .write_event(Event::End(BytesStart::new("Response").to_end()))
        .map_err(|e| Error::Markup(e.to_string()))?;

    let xml = writer.into_inner().into_inner();
    String::from_utf8(xml).map_err(|e| Error::Markup(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn spoken_text(xml: &str) -> String {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_say = false;
        let mut text = String::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"Say" => in_say = true,
                Ok(Event::End(ref e)) if e.name().as_ref() == b"Say" => in_say = false,
                Ok(Event::Text(ref e)) if in_say => {
                    text.push_str(&e.unescape().unwrap());
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid TwiML: {}", e),
                _ => {}
            }
            buf.clear();
        }
        text
    }

    #[test]
    fn test_prompt_repeats_patient_id() {
        let prompt = render_prompt(Some("12345"));
        assert_eq!(prompt.matches("12345").count(), 2);
    }

    #[test]
    fn test_missing_patient_id_is_unknown() {
        assert_eq!(render_prompt(None).matches(UNKNOWN_PATIENT).count(), 2);
        assert_eq!(render_prompt(Some("  ")).matches(UNKNOWN_PATIENT).count(), 2);
    }

    #[test]
    fn test_voice_response_shape() {
        let xml = render_voice_response(&render_prompt(Some("12345"))).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<Say voice="alice" language="en-US">"#));
        assert!(xml.ends_with("</Response>"));
        assert_eq!(spoken_text(&xml), render_prompt(Some("12345")));
    }

    #[test]
    fn test_patient_id_is_escaped() {
        let hostile = "</Say><Dial>+15005550006</Dial>";
        let xml = render_voice_response(&render_prompt(Some(hostile))).unwrap();

        assert!(!xml.contains("<Dial>"));
        assert_eq!(spoken_text(&xml).matches(hostile).count(), 2);
    }
}
