use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, Local, Offset, TimeZone, Timelike};
use pdf_writer::{Date, Pdf, TextStr};

/// General document metadata such as title, author, etc
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    /// The title of the document.
    pub title: Option<String>,
    /// The author(s) of the document. No prescribed format.
    pub author: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
    /// Keywords for the document, usually comma separated
    pub keywords: Option<String>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    pub fn title<S: ToString>(mut self, title: S) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author<S: ToString>(mut self, author: S) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn subject<S: ToString>(mut self, subject: S) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn keywords<S: ToString>(mut self, keywords: S) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        info.producer(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(&Local::now()));
    }
}

/// Convert a timestamp into a PDF date, keeping its UTC offset
fn pdf_date<Tz: TimeZone>(when: &DateTime<Tz>) -> Date {
    let offset_seconds = when.offset().fix().local_minus_utc();
    let hours = offset_seconds / 3600;
    let minutes = (offset_seconds % 3600 / 60).abs();
    Date::new(when.year() as u16)
        .month(when.month() as u8)
        .day(when.day() as u8)
        .hour(when.hour() as u8)
        .minute(when.minute() as u8)
        .second(when.second() as u8)
        .utc_offset_hour(hours as i8)
        .utc_offset_minute(minutes as u8)
}
