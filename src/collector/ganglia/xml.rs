//! Streaming decoder for the gmond XML dump.
//!
//! The document is pulled event by event from any `BufRead`, so a remote
//! side that streams its output is decoded as it arrives. Decoding stops as
//! soon as the root element closes; nothing after it is read.
//!
//! Expected shape:
//!
//! ```text
//! GANGLIA_XML
//! └── CLUSTER NAME
//!     └── HOST NAME
//!         └── METRIC NAME VAL [TYPE] [UNITS]
//!             └── EXTRA_DATA
//!                 └── EXTRA_ELEMENT NAME VAL
//! ```
//!
//! Unknown elements and attributes are skipped together with their children.

use std::io::{self, BufRead};

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::ganglia::document::{Cluster, ExtraElement, GangliaDocument, Host, Metric};

const ROOT_ELEMENT: &[u8] = b"GANGLIA_XML";

/// Position of the decoder in the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Cluster,
    Host,
    Metric,
    ExtraData,
    Skipped,
}

/// Hook for the charset declared in the XML prologue.
///
/// This is a no-op transcoder: the payload is always decoded as UTF-8,
/// whatever the declaration says. gmond declares `ISO-8859-1` but only emits
/// ASCII in practice, which decodes identically. A payload that really uses
/// non-ASCII Latin-1 bytes fails to decode. Proper transcoding is a known gap.
pub fn accept_charset(charset: &str) {
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("utf8") {
        debug!("Treating {} payload as UTF-8", charset);
    }
}

fn decode_error(position: impl std::fmt::Display, msg: impl std::fmt::Display) -> CollectError {
    CollectError::Decode(format!("{} at byte {}", msg, position))
}

fn map_xml_error(e: quick_xml::Error, position: impl std::fmt::Display) -> CollectError {
    match e {
        quick_xml::Error::Io(io) => CollectError::Io(io::Error::new(io.kind(), io.to_string())),
        other => decode_error(position, other),
    }
}

/// Returns the unescaped value of an attribute, if present.
fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == name {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(e: &BytesStart, element: &str, name: &[u8]) -> Result<String, String> {
    attribute(e, name)?.ok_or_else(|| {
        format!(
            "{} element without {} attribute",
            element,
            String::from_utf8_lossy(name)
        )
    })
}

fn parse_metric(e: &BytesStart) -> Result<Metric, String> {
    let name = required_attribute(e, "METRIC", b"NAME")?;
    let raw_value = required_attribute(e, "METRIC", b"VAL")?;
    let metric_type = attribute(e, b"TYPE")?.unwrap_or_default();
    let units = attribute(e, b"UNITS")?.unwrap_or_default();

    let value = if metric_type == "string" {
        None
    } else {
        let value = raw_value
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("metric {}: invalid VAL '{}': {}", name, raw_value, err))?;
        Some(value)
    };

    Ok(Metric {
        name,
        value,
        metric_type,
        units,
        extra_elements: Vec::new(),
    })
}

fn handle_decl(decl: &BytesDecl) -> Result<(), String> {
    if let Some(encoding) = decl.encoding() {
        let encoding = encoding.map_err(|err| err.to_string())?;
        accept_charset(&String::from_utf8_lossy(&encoding));
    }
    Ok(())
}

/// Appends the element to the document and returns the frame to push.
fn open_element(
    document: &mut GangliaDocument,
    parent: Option<Frame>,
    e: &BytesStart,
) -> Result<Frame, String> {
    let frame = match (parent, e.name().as_ref()) {
        (None, ROOT_ELEMENT) => Frame::Root,
        (None, other) => {
            return Err(format!(
                "expected root element GANGLIA_XML, found {}",
                String::from_utf8_lossy(other)
            ));
        }
        (Some(Frame::Root), b"CLUSTER") => {
            document.clusters.push(Cluster {
                name: required_attribute(e, "CLUSTER", b"NAME")?,
                hosts: Vec::new(),
            });
            Frame::Cluster
        }
        (Some(Frame::Cluster), b"HOST") => {
            let name = required_attribute(e, "HOST", b"NAME")?;
            let cluster = document
                .clusters
                .last_mut()
                .ok_or("HOST outside of CLUSTER")?;
            cluster.hosts.push(Host {
                name,
                metrics: Vec::new(),
            });
            Frame::Host
        }
        (Some(Frame::Host), b"METRIC") => {
            let metric = parse_metric(e)?;
            let host = document
                .clusters
                .last_mut()
                .and_then(|c| c.hosts.last_mut())
                .ok_or("METRIC outside of HOST")?;
            host.metrics.push(metric);
            Frame::Metric
        }
        (Some(Frame::Metric), b"EXTRA_DATA") => Frame::ExtraData,
        (Some(Frame::ExtraData), b"EXTRA_ELEMENT") => {
            let element = ExtraElement::new(
                required_attribute(e, "EXTRA_ELEMENT", b"NAME")?,
                required_attribute(e, "EXTRA_ELEMENT", b"VAL")?,
            );
            let metric = document
                .clusters
                .last_mut()
                .and_then(|c| c.hosts.last_mut())
                .and_then(|h| h.metrics.last_mut())
                .ok_or("EXTRA_ELEMENT outside of METRIC")?;
            metric.extra_elements.push(element);
            Frame::Skipped
        }
        _ => Frame::Skipped,
    };
    Ok(frame)
}

/// Decodes a gmond XML document from a buffered stream.
///
/// Returns `CollectError::Decode` for malformed XML, a wrong root element,
/// missing required attributes, a non-numeric value of a numeric metric or a
/// document truncated before the root element closes. I/O failures of the
/// underlying stream, including read timeouts, are returned as `CollectError::Io`.
pub fn decode_document<R: BufRead>(input: R) -> Result<GangliaDocument, CollectError> {
    let mut reader = Reader::from_reader(input);
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut document = GangliaDocument::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| map_xml_error(e, reader.buffer_position()))?;
        let position = reader.buffer_position();

        match event {
            Event::Decl(ref decl) => {
                handle_decl(decl).map_err(|msg| decode_error(position, msg))?;
            }
            Event::Start(ref e) => {
                let frame = open_element(&mut document, stack.last().copied(), e)
                    .map_err(|msg| decode_error(position, msg))?;
                stack.push(frame);
            }
            Event::End(_) => {
                stack.pop();
                if stack.is_empty() {
                    break;
                }
            }
            Event::Eof => {
                return Err(decode_error(position, "unexpected end of document"));
            }
            Event::Text(ref text) if stack.is_empty() => {
                return Err(decode_error(
                    position,
                    format!(
                        "unexpected text outside of root element: {:?}",
                        String::from_utf8_lossy(text)
                    ),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(
        "Decoded gmond document: {} clusters, {} metrics",
        document.clusters.len(),
        document.metric_count()
    );
    Ok(document)
}
