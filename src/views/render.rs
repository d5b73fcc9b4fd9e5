use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub enabled: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            enabled,
        }
    }
}

/// One rendered element of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Alert { kind: AlertKind, text: String },
    Field { label: String, value: String },
    Checkbox { label: String, checked: bool },
    Button(Button),
    Card {
        title: String,
        active: bool,
        body: String,
        actions: Vec<Button>,
    },
}

/// Output of a view's `render`: an ordered list of blocks, printable as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn heading(&mut self, level: u8, text: impl Into<String>) -> &mut Self {
        self.push(Block::Heading {
            level,
            text: text.into(),
        })
    }

    pub fn paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Block::Paragraph(text.into()))
    }

    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn alerts(&self) -> impl Iterator<Item = (AlertKind, &str)> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Alert { kind, text } => Some((*kind, text.as_str())),
            _ => None,
        })
    }

    pub fn cards(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| matches!(b, Block::Card { .. }))
    }

    /// Every button on the page, including card actions.
    pub fn buttons(&self) -> Vec<&Button> {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Button(b) => out.push(b),
                Block::Card { actions, .. } => out.extend(actions.iter()),
                _ => {}
            }
        }
        out
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{block}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "[ {} ]", self.label)
        } else {
            write!(f, "[ {} ] (disabled)", self.label)
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Heading { level, text } => {
                writeln!(f, "{} {}", "#".repeat(usize::from((*level).max(1))), text)
            }
            Block::Paragraph(text) => writeln!(f, "{text}"),
            Block::Alert { kind, text } => match kind {
                AlertKind::Error => writeln!(f, "!! {text}"),
                AlertKind::Success => writeln!(f, "ok {text}"),
            },
            Block::Field { label, value } => {
                writeln!(f, "{label}")?;
                for line in value.lines() {
                    writeln!(f, "  | {line}")?;
                }
                Ok(())
            }
            Block::Checkbox { label, checked } => {
                writeln!(f, "[{}] {label}", if *checked { "x" } else { " " })
            }
            Block::Button(b) => writeln!(f, "{b}"),
            Block::Card {
                title,
                active,
                body,
                actions,
            } => {
                if *active {
                    writeln!(f, "### {title}  ACTIVE")?;
                } else {
                    writeln!(f, "### {title}")?;
                }
                for line in body.lines() {
                    writeln!(f, "    {line}")?;
                }
                let actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
                writeln!(f, "    {}", actions.join(" "))
            }
        }
    }
}
