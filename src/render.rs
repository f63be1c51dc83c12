//! # Renderer
//!
//! Pure functions from a collection snapshot to display nodes. Each node
//! carries [`Action`] descriptors (kind plus entity id) that the
//! [`Dispatcher`](crate::dispatch::Dispatcher) maps back onto controller
//! calls. Nothing here fetches or mutates.

use crate::framework::ResourceKind;
use crate::model::{Message, MessageId, Project, ProjectId, Skill, SkillId};
use std::fmt::{self, Display};

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// The entity an action refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Skill(SkillId),
    Project(ProjectId),
    Message(MessageId),
}

impl Target {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Target::Skill(_) => ResourceKind::Skill,
            Target::Project(_) => ResourceKind::Project,
            Target::Message(_) => ResourceKind::Message,
        }
    }
}

/// Opaque action bound to a rendered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Edit(Target),
    Delete(Target),
    /// Open an external compose link; handled outside the controllers.
    Reply { href: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNode {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub footer: Option<String>,
    pub actions: Vec<Action>,
}

/// Rendered form of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    pub kind: ResourceKind,
    /// Shown instead of the nodes when the snapshot is empty.
    pub placeholder: Option<&'static str>,
    pub nodes: Vec<DisplayNode>,
}

impl RenderedList {
    fn build(kind: ResourceKind, empty_text: &'static str, nodes: Vec<DisplayNode>) -> Self {
        let placeholder = nodes.is_empty().then_some(empty_text);
        Self {
            kind,
            placeholder,
            nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every action in display order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.nodes.iter().flat_map(|node| node.actions.iter())
    }
}

impl Display for RenderedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.kind.collection())?;
        if let Some(placeholder) = self.placeholder {
            return writeln!(f, "  {placeholder}");
        }
        for node in &self.nodes {
            write!(f, "  {}", node.title)?;
            if let Some(subtitle) = &node.subtitle {
                write!(f, " {subtitle}")?;
            }
            writeln!(f)?;
            for line in [&node.body, &node.footer].into_iter().flatten() {
                writeln!(f, "    {line}")?;
            }
        }
        Ok(())
    }
}

pub fn render_skills(skills: &[Skill]) -> RenderedList {
    let nodes = skills
        .iter()
        .map(|skill| DisplayNode {
            title: skill.name.clone(),
            actions: edit_and_delete(skill.id.clone().map(Target::Skill)),
            ..DisplayNode::default()
        })
        .collect();
    RenderedList::build(ResourceKind::Skill, "No skills added yet.", nodes)
}

pub fn render_projects(projects: &[Project]) -> RenderedList {
    let nodes = projects
        .iter()
        .map(|project| DisplayNode {
            title: project.name.clone(),
            body: Some(preview(&project.description)),
            footer: Some(project.tech.join(", ")),
            actions: edit_and_delete(project.id.clone().map(Target::Project)),
            ..DisplayNode::default()
        })
        .collect();
    RenderedList::build(ResourceKind::Project, "No projects added yet.", nodes)
}

pub fn render_messages(messages: &[Message]) -> RenderedList {
    let nodes = messages
        .iter()
        .map(|message| {
            let mut actions = Vec::new();
            if let Some(id) = &message.id {
                actions.push(Action::Delete(Target::Message(id.clone())));
            }
            if let Some(href) = gmail_reply_link(&message.email) {
                actions.push(Action::Reply { href });
            }
            DisplayNode {
                title: message.name.clone(),
                subtitle: Some(format!("<{}>", message.email)),
                body: Some(message.message.clone()),
                footer: message
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
                actions,
            }
        })
        .collect();
    RenderedList::build(ResourceKind::Message, "No messages found from visitors.", nodes)
}

// Entities the server has not assigned an id to cannot be targeted.
fn edit_and_delete(target: Option<Target>) -> Vec<Action> {
    match target {
        Some(target) => vec![Action::Edit(target.clone()), Action::Delete(target)],
        None => Vec::new(),
    }
}

/// First 100 characters of the description followed by `...`.
fn preview(description: &str) -> String {
    let head: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// Gmail compose link for gmail addresses; other senders get none.
///
/// The address is percent-encoded so `+` or `&` in it cannot alter the query.
pub fn gmail_reply_link(email: &str) -> Option<String> {
    email.ends_with("@gmail.com").then(|| {
        format!(
            "https://mail.google.com/mail/?view=cm&fs=1&to={}",
            urlencoding::encode(email)
        )
    })
}
