use crate::domain::model::RawMessage;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// SMS 匯出檔的元素與屬性名稱，必須與匯出工具完全一致
const SMS_ELEMENT: &[u8] = b"sms";
const ADDRESS_ATTR: &[u8] = b"address";
const DATE_ATTR: &[u8] = b"readable_date";
const BODY_ATTR: &[u8] = b"body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(Url),
}

impl SourceLocation {
    pub fn parse(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source).map_err(|e| EtlError::InvalidConfigValueError {
                field: "source".to_string(),
                value: source.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
            Ok(SourceLocation::Remote(url))
        } else {
            Ok(SourceLocation::Local(PathBuf::from(source)))
        }
    }

    pub async fn fetch(&self, client: &Client) -> Result<Vec<u8>> {
        match self {
            SourceLocation::Local(path) => {
                tracing::debug!("Reading SMS export from {}", path.display());
                Ok(tokio::fs::read(path).await?)
            }
            SourceLocation::Remote(url) => {
                tracing::debug!("Downloading SMS export from {}", url);
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(EtlError::SourceUnavailableError {
                        location: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

/// 解析整份匯出檔，只取根節點底下直接的 `<sms>` 元素。
///
/// 文件結構錯誤（標籤不配對、沒有根節點、根節點外有雜訊）一律回傳錯誤，
/// 不嘗試部分復原。
pub fn parse_sms_export(xml: &[u8]) -> Result<Vec<RawMessage>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut messages = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                if depth == 0 {
                    ensure_single_root(&mut saw_root)?;
                } else if depth == 1 && element.name().as_ref() == SMS_ELEMENT {
                    messages.push(read_message(&element, messages.len())?);
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if depth == 0 {
                    ensure_single_root(&mut saw_root)?;
                } else if depth == 1 && element.name().as_ref() == SMS_ELEMENT {
                    messages.push(read_message(&element, messages.len())?);
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Text(text) if depth == 0 => {
                if !text.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(EtlError::SourceFormatError {
                        message: "text content outside of the root element".to_string(),
                    });
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(EtlError::SourceFormatError {
                    message: "CDATA section outside of the root element".to_string(),
                });
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(EtlError::SourceFormatError {
            message: "no root element found".to_string(),
        });
    }
    if depth != 0 {
        return Err(EtlError::SourceFormatError {
            message: format!("document ended with {} unclosed element(s)", depth),
        });
    }

    Ok(messages)
}

fn ensure_single_root(saw_root: &mut bool) -> Result<()> {
    if *saw_root {
        return Err(EtlError::SourceFormatError {
            message: "junk after document element".to_string(),
        });
    }
    *saw_root = true;
    Ok(())
}

fn read_message(element: &BytesStart<'_>, index: usize) -> Result<RawMessage> {
    let mut address = None;
    let mut date = None;
    let mut body = None;

    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            ADDRESS_ATTR => address = Some(value),
            DATE_ATTR => date = Some(value),
            BODY_ATTR => body = Some(value),
            _ => {}
        }
    }

    Ok(RawMessage {
        index,
        address,
        date,
        body: body.unwrap_or_default(),
    })
}
