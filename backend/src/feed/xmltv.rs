//! XMLTV document reader.
//!
//! Only the fields the guide consumes are read:
//!
//! ```text
//! <tv>
//!   <channel id="I5.kpix">
//!     <display-name>5</display-name>
//!     <display-name>KPIX</display-name>
//!   </channel>
//!   <programme start="20240324010000 -0700" stop="20240324020000 -0700" channel="I5.kpix">
//!     <title>Evening News</title>
//!     <category>News</category>
//!     <audio><stereo>stereo</stereo></audio>
//!     <subtitles type="teletext"/>
//!     <rating system="VCHIP"><value>TV-PG</value></rating>
//!   </programme>
//! </tv>
//! ```

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{GuideError, GuideResult};
use crate::models::{parse_xmltv_time, ChannelInfo, Rating, RawProgramme};

/// Channels and programmes of one parsed feed, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub channels: Vec<ChannelInfo>,
    pub programmes: Vec<RawProgramme>,
}

/// Parse XMLTV text. `source_name` is only used to label errors.
pub fn parse_document(text: &str, source_name: &str) -> GuideResult<FeedDocument> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options).map_err(|e| {
        GuideError::source_unavailable(source_name, format!("malformed XML: {}", e))
    })?;

    let root = doc.root_element();
    if !root.has_tag_name("tv") {
        return Err(GuideError::source_unavailable(
            source_name,
            format!("expected <tv> root element, found <{}>", root.tag_name().name()),
        ));
    }

    let mut feed = FeedDocument::default();
    for node in root.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "channel" => feed.channels.push(read_channel(node, source_name)?),
            "programme" => feed.programmes.push(read_programme(node, source_name)?),
            _ => {}
        }
    }

    Ok(feed)
}

fn read_channel(node: Node<'_, '_>, source_name: &str) -> GuideResult<ChannelInfo> {
    let id = required_attribute(node, "id", source_name)?;
    let names: Vec<&str> = children_named(node, "display-name")
        .map(element_text)
        .collect();

    Ok(ChannelInfo::from_display_names(id, &names))
}

fn read_programme(node: Node<'_, '_>, source_name: &str) -> GuideResult<RawProgramme> {
    let channel_id = required_attribute(node, "channel", source_name)?;
    let start = parse_xmltv_time(required_attribute(node, "start", source_name)?)?;
    let stop = parse_xmltv_time(required_attribute(node, "stop", source_name)?)?;

    if stop <= start {
        return Err(GuideError::invalid_format(
            format!("{} .. {}", start.to_rfc3339(), stop.to_rfc3339()),
            "a programme whose stop is after its start",
        ));
    }

    let title = children_named(node, "title")
        .next()
        .map(element_text)
        .ok_or_else(|| {
            GuideError::source_unavailable(
                source_name,
                format!("programme on '{}' at {} has no <title>", channel_id, start),
            )
        })?;

    let categories = children_named(node, "category")
        .map(|n| element_text(n).to_string())
        .collect();

    // Some grabbers write <stereo> directly under <programme>, others nest it in <audio>.
    let stereo = children_named(node, "stereo")
        .chain(children_named(node, "audio").flat_map(|audio| children_named(audio, "stereo")))
        .next()
        .map(|n| element_text(n).to_string());

    let subtitles = children_named(node, "subtitles")
        .find_map(|n| n.attribute("type"))
        .map(str::to_string);

    let ratings = children_named(node, "rating")
        .filter_map(|n| {
            children_named(n, "value").next().map(|value| Rating {
                system: n.attribute("system").map(str::to_string),
                value: element_text(value).to_string(),
            })
        })
        .collect();

    Ok(RawProgramme {
        channel_id: channel_id.to_string(),
        start,
        stop,
        title: title.to_string(),
        categories,
        stereo,
        subtitles,
        ratings,
    })
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    name: &str,
    source_name: &str,
) -> GuideResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        GuideError::source_unavailable(
            source_name,
            format!(
                "<{}> element at byte {} is missing the '{}' attribute",
                node.tag_name().name(),
                node.range().start,
                name
            ),
        )
    })
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.has_tag_name(name))
}

fn element_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}
