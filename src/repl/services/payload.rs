//! # Payload Service
//!
//! Decides where a request body comes from. For an item resource (a node
//! standing for a template variable) the current state is read back from the
//! server so the payload satisfies constraints a generator cannot infer;
//! otherwise, or when that read fails, a skeleton instance is synthesized
//! from the schema. Either way the payload lands in the scratch file, which an
//! optional external editor may change or delete before the send.

use super::http::{HttpRequest, Transport};
use crate::wadl::{QName, Representation, SchemaDocument, SchemaInstanceGenerator};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content type assumed for representations that only name an element
pub const DEFAULT_XML_CONTENT_TYPE: &str = "application/xml";

/// The representation picked for one send
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationChoice {
    pub representation: Representation,
    pub content_type: Option<String>,
    pub element: Option<QName>,
}

impl RepresentationChoice {
    pub fn new(representation: &Representation) -> Self {
        let content_type = representation.media_type.clone().or_else(|| {
            representation
                .element
                .as_ref()
                .map(|_| DEFAULT_XML_CONTENT_TYPE.to_string())
        });
        Self {
            representation: representation.clone(),
            content_type,
            element: representation.element.clone(),
        }
    }
}

/// Pick one of `candidates` uniformly at random
pub fn choose_representation<R: Rng + ?Sized>(
    candidates: &[Representation],
    rng: &mut R,
) -> Option<RepresentationChoice> {
    candidates.choose(rng).map(RepresentationChoice::new)
}

/// Interactive edit step run against the scratch file
#[async_trait]
pub trait PayloadEditor: Send + Sync {
    /// Block until the user is done with `file`
    async fn edit(&self, file: &Path, content_type: &str) -> Result<()>;
}

/// Runs a configured command line with the scratch file appended
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Parse a command line such as `code --wait`; `None` when blank
    pub fn from_command(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

#[async_trait]
impl PayloadEditor for ExternalEditor {
    async fn edit(&self, file: &Path, content_type: &str) -> Result<()> {
        tracing::info!("Launching editor '{}' for {} ({})", self.program, file.display(), content_type);
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .status()
            .await
            .with_context(|| format!("failed to launch editor '{}'", self.program))?;
        tracing::debug!("Editor exited with {}", status);
        Ok(())
    }
}

/// Everything the resolver needs to know about the send being prepared
#[derive(Debug, Clone)]
pub struct PayloadTarget<'a> {
    pub choice: &'a RepresentationChoice,
    /// Decorated GET against the same resource, present only for item
    /// resources that declare one
    pub live_read: Option<HttpRequest>,
    pub schema: Option<Arc<SchemaDocument>>,
}

/// Result of payload resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The representation names no element; send without a body
    Empty,
    Body(Bytes),
    /// The scratch file was removed during editing; do not send
    Aborted,
}

pub struct PayloadResolver {
    scratch: PathBuf,
    generator: Box<dyn SchemaInstanceGenerator>,
    editor: Option<Box<dyn PayloadEditor>>,
}

impl PayloadResolver {
    pub fn new(scratch: impl Into<PathBuf>, generator: Box<dyn SchemaInstanceGenerator>) -> Self {
        Self {
            scratch: scratch.into(),
            generator,
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: Option<Box<dyn PayloadEditor>>) -> Self {
        self.editor = editor;
        self
    }

    pub fn scratch_file(&self) -> &Path {
        &self.scratch
    }

    pub async fn resolve(&self, target: PayloadTarget<'_>, transport: &dyn Transport) -> Result<Payload> {
        let Some(element) = target.choice.element.as_ref() else {
            return Ok(Payload::Empty);
        };

        let live = match &target.live_read {
            Some(request) => Self::read_live(request, transport).await,
            None => None,
        };
        let bytes = match live {
            Some(bytes) => bytes,
            None => {
                tracing::debug!("Synthesizing payload for {}", element);
                Bytes::from(self.generator.generate(target.schema.as_deref(), element)?)
            }
        };

        tokio::fs::write(&self.scratch, &bytes)
            .await
            .with_context(|| format!("cannot write {}", self.scratch.display()))?;

        let Some(editor) = &self.editor else {
            return Ok(Payload::Body(bytes));
        };

        let content_type = target
            .choice
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_XML_CONTENT_TYPE);
        editor.edit(&self.scratch, content_type).await?;

        if !tokio::fs::try_exists(&self.scratch).await.unwrap_or(false) {
            tracing::info!("Scratch file {} removed; send aborted", self.scratch.display());
            return Ok(Payload::Aborted);
        }
        let edited = tokio::fs::read(&self.scratch)
            .await
            .with_context(|| format!("cannot read {}", self.scratch.display()))?;
        Ok(Payload::Body(Bytes::from(edited)))
    }

    /// Body of a successful live read; `None` on any failure
    async fn read_live(request: &HttpRequest, transport: &dyn Transport) -> Option<Bytes> {
        tracing::debug!("Reading live payload from {}", request.url);
        match transport.execute(request).await {
            Ok(response) if response.is_success() && !response.body.is_empty() => Some(response.body),
            Ok(response) => {
                tracing::debug!("Live read returned {}; falling back to synthesis", response.status);
                None
            }
            Err(e) => {
                tracing::debug!("Live read failed: {:#}; falling back to synthesis", e);
                None
            }
        }
    }
}
