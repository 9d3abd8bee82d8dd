/*!
 * Format-agnostic inline markup.
 *
 * A cue's text is a sequence of `MarkupRun`s, each carrying the style flags and
 * color that were active when the text was encountered. Both codecs share the
 * decomposition loop below and differ only in their `InlineSyntax`.
 */

use bitflags::bitflags;
use log::trace;

/// Delimiters of every inline syntax; never part of run content
pub const RESERVED_DELIMITERS: [char; 4] = ['<', '>', '{', '}'];

bitflags! {
    /// The four binary text attributes a run can carry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyle: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
    }
}

/// A single text attribute, in the fixed order used when emitting tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl Attribute {
    /// All attributes in enumeration order
    pub const ALL: [Attribute; 4] = [
        Attribute::Bold,
        Attribute::Italic,
        Attribute::Underline,
        Attribute::Strikethrough,
    ];

    /// The style flag backing this attribute
    pub fn flag(self) -> TextStyle {
        match self {
            Attribute::Bold => TextStyle::BOLD,
            Attribute::Italic => TextStyle::ITALIC,
            Attribute::Underline => TextStyle::UNDERLINE,
            Attribute::Strikethrough => TextStyle::STRIKETHROUGH,
        }
    }
}

/// Turning one attribute on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleChange {
    Set(Attribute),
    Clear(Attribute),
}

impl TextStyle {
    /// Whether the attribute is active
    pub fn has(self, attribute: Attribute) -> bool {
        self.contains(attribute.flag())
    }

    /// Apply a single change. Clearing an attribute that is not set is a no-op.
    pub fn apply(&mut self, change: StyleChange) {
        match change {
            StyleChange::Set(attribute) => self.insert(attribute.flag()),
            StyleChange::Clear(attribute) => self.remove(attribute.flag()),
        }
    }

    /// Changes needed to go from `self` to `target`.
    ///
    /// Clears come first in reverse enumeration order, then sets in forward order,
    /// so tags opened last are closed first.
    pub fn transition_to(self, target: TextStyle) -> Vec<StyleChange> {
        let clears = Attribute::ALL
            .iter()
            .rev()
            .filter(|a| self.has(**a) && !target.has(**a))
            .map(|a| StyleChange::Clear(*a));
        let sets = Attribute::ALL
            .iter()
            .filter(|a| !self.has(**a) && target.has(**a))
            .map(|a| StyleChange::Set(*a));

        clears.chain(sets).collect()
    }
}

/// A span of text sharing one style and color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRun {
    content: String,
    style: TextStyle,
    color: Option<String>,
}

impl MarkupRun {
    /// Create a run. Delimiter characters are removed from the content and an
    /// empty color string is treated as no color.
    pub fn new(content: impl Into<String>, style: TextStyle, color: Option<String>) -> Self {
        let mut content = content.into();
        content.retain(|c| !RESERVED_DELIMITERS.contains(&c));
        Self {
            content,
            style,
            color: color.filter(|c| !c.is_empty()),
        }
    }

    /// Create an unstyled run
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, TextStyle::empty(), None)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn bold(&self) -> bool {
        self.style.has(Attribute::Bold)
    }

    pub fn italic(&self) -> bool {
        self.style.has(Attribute::Italic)
    }

    pub fn underline(&self) -> bool {
        self.style.has(Attribute::Underline)
    }

    pub fn strikethrough(&self) -> bool {
        self.style.has(Attribute::Strikethrough)
    }
}

/// What a recognized inline tag or override code does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Style(StyleChange),
    PushColor(String),
    PopColor,
}

/// Delimiters and directive vocabulary of one codec's inline markup
pub trait InlineSyntax {
    const OPEN: char;
    const CLOSE: char;

    /// Interpret the text between delimiters; `None` for unrecognized tokens
    fn directive(token: &str) -> Option<Directive>;
}

/// Transient style state threaded through one decomposition pass
#[derive(Debug, Default)]
struct StyleState {
    style: TextStyle,
    colors: Vec<String>,
}

impl StyleState {
    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Style(change) => self.style.apply(change),
            Directive::PushColor(color) => self.colors.push(color),
            Directive::PopColor => {
                self.colors.pop();
            }
        }
    }

    fn run(&self, content: &str) -> MarkupRun {
        MarkupRun::new(content, self.style, self.colors.last().cloned())
    }
}

/// Split raw cue text into runs.
///
/// Tokens between delimiters alternate literal/directive. Only literal tokens that
/// are non-empty once the other syntax's delimiters are dropped produce a run, so
/// several directives in a row collapse into the style of the next run.
pub fn decompose<S: InlineSyntax>(text: &str) -> Vec<MarkupRun> {
    let mut state = StyleState::default();
    let mut runs = Vec::new();

    for (i, token) in text.split([S::OPEN, S::CLOSE]).enumerate() {
        if i % 2 == 0 {
            let run = state.run(token);
            if !run.content().is_empty() {
                runs.push(run);
            }
        } else if let Some(directive) = S::directive(token) {
            state.apply(directive);
        } else {
            trace!("Ignoring unrecognized inline tag: {}", token);
        }
    }

    runs
}
