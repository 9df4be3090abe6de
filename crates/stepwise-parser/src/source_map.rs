//! Source positions of YAML nodes
//!
//! `serde_yaml` values carry no locations, so the document text is walked a
//! second time as a marked event stream. Every node's start is recorded
//! under its path from the document root (`procedure.body[3]`), and the
//! procedure parser looks statements up by the same path.

use crate::error::{ParseError, Result};
use std::collections::HashMap;
use std::fmt;
use stepwise_core::Span;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

/// One step of a node path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Path of a node from its document root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the value under `key`
    pub fn key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_string()))
    }

    /// Path of the sequence item at `index`
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Start positions of the nodes of one document
#[derive(Debug, Clone, Default)]
pub struct SourcePositions {
    nodes: HashMap<NodePath, Span>,
}

impl SourcePositions {
    /// Positions of every mapping-rooted document in `text`
    pub fn collect(text: &str) -> Result<Vec<SourcePositions>> {
        let lines: Vec<u32> = (1..=text.lines().count() as u32).collect();
        Self::collect_mapped(text, &lines)
    }

    /// Like `collect`, for text whose line `n` (1-based) was line
    /// `lines[n - 1]` of the original document
    pub(crate) fn collect_mapped(text: &str, lines: &[u32]) -> Result<Vec<SourcePositions>> {
        let mut collector = PositionCollector {
            lines,
            documents: Vec::new(),
            frames: Vec::new(),
            recording: false,
        };
        Parser::new_from_str(text)
            .load(&mut collector, true)
            .map_err(|error| ParseError::ParseError(format!("cannot locate YAML nodes: {}", error)))?;
        Ok(collector.documents)
    }

    /// Where the node at `path` starts; unknown if it was never seen
    pub fn span(&self, path: &NodePath) -> Span {
        self.nodes.get(path).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

enum Container {
    /// `key` holds the pending key once it has been read
    Mapping { key: Option<String> },
    Sequence { next: usize },
}

struct Frame {
    path: NodePath,
    container: Container,
}

struct PositionCollector<'a> {
    lines: &'a [u32],
    documents: Vec<SourcePositions>,
    frames: Vec<Frame>,
    /// Whether the current document has a mapping root
    recording: bool,
}

impl PositionCollector<'_> {
    fn span(&self, mark: Marker) -> Span {
        let line = self
            .lines
            .get(mark.line().saturating_sub(1))
            .copied()
            .unwrap_or(mark.line() as u32);
        Span::new(line, mark.col() as u32 + 1)
    }

    fn node(&mut self, scalar: Option<String>, mark: Marker, container: Option<Container>) {
        let (path, is_value) = match self.frames.last_mut() {
            None => {
                self.recording = matches!(container, Some(Container::Mapping { .. }));
                if self.recording {
                    self.documents.push(SourcePositions::default());
                }
                (NodePath::root(), true)
            }
            Some(frame) => match &mut frame.container {
                Container::Mapping { key } => match key.take() {
                    Some(key) => (frame.path.key(&key), true),
                    None => {
                        *key = Some(scalar.unwrap_or_default());
                        (frame.path.key(""), false)
                    }
                },
                Container::Sequence { next } => {
                    let path = frame.path.index(*next);
                    *next += 1;
                    (path, true)
                }
            },
        };

        // Keys are only remembered
        if is_value && self.recording {
            let span = self.span(mark);
            if let Some(document) = self.documents.last_mut() {
                document.nodes.insert(path.clone(), span);
            }
        }
        if let Some(container) = container {
            self.frames.push(Frame { path, container });
        }
    }
}

impl MarkedEventReceiver for PositionCollector<'_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        match event {
            Event::Scalar(value, ..) => self.node(Some(value), mark, None),
            Event::Alias(..) => self.node(None, mark, None),
            Event::SequenceStart(..) => {
                self.node(None, mark, Some(Container::Sequence { next: 0 }))
            }
            Event::MappingStart(..) => {
                self.node(None, mark, Some(Container::Mapping { key: None }))
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.frames.pop();
            }
            _ => {}
        }
    }
}
