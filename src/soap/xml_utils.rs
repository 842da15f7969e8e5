use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::CrossBorderError;

pub type XmlResult = Result<String, CrossBorderError>;

fn xml_io(e: std::io::Error) -> CrossBorderError {
    CrossBorderError::Xml(format!("XML write error: {e}"))
}

/// Compact XML writer. No declaration and no indentation: the service
/// receives the envelope exactly as written.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    pub fn into_string(self) -> XmlResult {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| CrossBorderError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, CrossBorderError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, CrossBorderError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Self-closing element, e.g. `<soapenv:Header/>`.
    pub fn empty_element(&mut self, name: &str) -> Result<&mut Self, CrossBorderError> {
        self.writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, CrossBorderError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, CrossBorderError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Text element carrying an `xsi:type` hint, e.g.
    /// `<partnerKey xsi:type="xsd:string">…</partnerKey>`.
    pub fn typed_element(
        &mut self,
        name: &str,
        xsi_type: &str,
        text: &str,
    ) -> Result<&mut Self, CrossBorderError> {
        self.start_element_with_attrs(name, &[("xsi:type", xsi_type)])?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Append an already serialized (and already escaped) fragment.
    pub fn raw(&mut self, fragment: &str) -> Result<&mut Self, CrossBorderError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(fragment)))
            .map_err(xml_io)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let mut w = XmlWriter::new();
        w.text_element("description", "Salt & <Pepper>").unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            "<description>Salt &amp; &lt;Pepper&gt;</description>"
        );
    }

    #[test]
    fn typed_and_raw() {
        let mut w = XmlWriter::new();
        w.start_element("request").unwrap();
        w.typed_element("language", "xsd:string", "en").unwrap();
        w.raw("<x>1</x>").unwrap();
        w.empty_element("y").unwrap();
        w.end_element("request").unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            r#"<request><language xsi:type="xsd:string">en</language><x>1</x><y/></request>"#
        );
    }
}
