/*!
 * Line classification.
 *
 * A single pass over the lines of a document decides each line's role and
 * whether it is kept, ignored or removed. Nested regions (front matter,
 * navigator, book front, image, math) are tracked by an explicit state
 * machine: one open/closed state per region and a transition table keyed on
 * marker predicates. A line carries at most one transition.
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{DocumentKind, LineRole};

/// Lines made only of paragraph / break markup
static HTML_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:</?p>|<br\s*/?>)+$").expect("Invalid break markup regex")
});

/// Block attribute lines such as `{.is-info}`
static BLOCK_ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{[^{}]*\}$").expect("Invalid block attribute regex")
});

const FRONT_MATTER_DELIMITER: &str = "---";
const TITLE_KEY: &str = "title:";
const DESCRIPTION_KEY: &str = "description:";
const COPYRIGHT_START: &str = "<p class=\"v-card\">";
const NAVIGATOR_START: &str = "<figure class=\"table chapter-navigator\">";
const BOOKFRONT_START: &str = "<div class=\"book-front\"";
const IMAGE_START: &str = "<figure class=\"image";
const FIGURE_END: &str = "</figure>";
const DIV_END: &str = "</div>";
const CAPTION_START: &str = "<figcaption>";
const MATH_DELIMITER: &str = "$$";

/// Nested region of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Navigator,
    BookFront,
    Image,
    Math,
}

impl Region {
    /// Role precedence when several regions are open
    const PRECEDENCE: [Region; 5] = [
        Region::Math,
        Region::Image,
        Region::Navigator,
        Region::BookFront,
        Region::Header,
    ];

    fn slot(self) -> usize {
        match self {
            Region::Header => 0,
            Region::Navigator => 1,
            Region::BookFront => 2,
            Region::Image => 3,
            Region::Math => 4,
        }
    }

    pub fn role(self) -> LineRole {
        match self {
            Region::Header => LineRole::Header,
            Region::Navigator => LineRole::Navigator,
            Region::BookFront => LineRole::BookFront,
            Region::Image => LineRole::Image,
            Region::Math => LineRole::Math,
        }
    }
}

/// Open/closed state of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    #[default]
    Closed,
    Open,
}

/// Marker predicates for one region
struct Transition {
    region: Region,
    opens: fn(&str, usize) -> bool,
    closes: fn(&str) -> bool,
}

/// One transition per region, indexed by `Region::slot`; openings are tried
/// in table order and the first match wins
static TRANSITIONS: [Transition; 5] = [
    Transition {
        region: Region::Header,
        opens: |line, index| index == 0 && line == FRONT_MATTER_DELIMITER,
        closes: |line| line == FRONT_MATTER_DELIMITER,
    },
    Transition {
        region: Region::Navigator,
        opens: |line, _| line.starts_with(NAVIGATOR_START),
        closes: |line| line.starts_with(FIGURE_END),
    },
    Transition {
        region: Region::BookFront,
        opens: |line, _| line.starts_with(BOOKFRONT_START),
        closes: |line| line.starts_with(DIV_END),
    },
    Transition {
        region: Region::Image,
        opens: |line, _| line.starts_with(IMAGE_START),
        closes: |line| line.starts_with(FIGURE_END),
    },
    Transition {
        region: Region::Math,
        opens: |line, _| line == MATH_DELIMITER,
        closes: |line| line == MATH_DELIMITER,
    },
];

/// Classification of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    pub role: LineRole,
    pub ignore: bool,
    pub remove: bool,
}

impl LineClass {
    fn keep(role: LineRole) -> Self {
        Self { role, ignore: false, remove: false }
    }

    fn ignore(role: LineRole) -> Self {
        Self { role, ignore: true, remove: false }
    }

    fn remove(role: LineRole) -> Self {
        Self { role, ignore: true, remove: true }
    }
}

/// Whether a line is structural noise that is never translated
pub fn is_always_ignored(trimmed: &str) -> bool {
    trimmed.is_empty()
        || HTML_BREAK_REGEX.is_match(trimmed)
        || is_empty_quote(trimmed)
        || BLOCK_ATTRIBUTE_REGEX.is_match(trimmed)
}

/// Whether a line is a quotation marker with nothing after it
pub fn is_empty_quote(trimmed: &str) -> bool {
    trimmed.starts_with('>') && trimmed[1..].trim().is_empty()
}

/// Region-tracking line classifier for one document
#[derive(Debug, Clone)]
pub struct LineClassifier {
    kind: DocumentKind,
    states: [RegionState; 5],
    index: usize,
}

impl LineClassifier {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            states: [RegionState::Closed; 5],
            index: 0,
        }
    }

    /// Classify every line of a document
    pub fn classify_all<S: AsRef<str>>(kind: DocumentKind, lines: &[S]) -> Vec<LineClass> {
        let mut classifier = Self::new(kind);
        lines.iter().map(|line| classifier.classify(line.as_ref())).collect()
    }

    pub fn state(&self, region: Region) -> RegionState {
        self.states[region.slot()]
    }

    fn is_open(&self, region: Region) -> bool {
        self.state(region) == RegionState::Open
    }

    /// Apply the first matching transition; returns the region it toggled.
    /// Closing markers shared by several open regions close the innermost one.
    fn step(&mut self, trimmed: &str) -> Option<Region> {
        let closing = Region::PRECEDENCE
            .into_iter()
            .find(|region| self.is_open(*region) && (TRANSITIONS[region.slot()].closes)(trimmed));
        let (region, next) = match closing {
            Some(region) => (region, RegionState::Closed),
            None => {
                let transition = TRANSITIONS.iter().find(|transition| {
                    !self.is_open(transition.region) && (transition.opens)(trimmed, self.index)
                })?;
                (transition.region, RegionState::Open)
            }
        };

        self.states[region.slot()] = next;
        trace!("line {}: {:?} -> {:?}", self.index + 1, region, next);
        Some(region)
    }

    /// Innermost open region by precedence
    fn open_region(&self) -> Option<Region> {
        Region::PRECEDENCE.into_iter().find(|region| self.is_open(*region))
    }

    /// Classify the next line of the document
    pub fn classify(&mut self, line: &str) -> LineClass {
        let trimmed = line.trim();
        let class = match self.step(trimmed) {
            Some(region) => self.boundary(region),
            None => self.content(trimmed),
        };
        self.index += 1;
        class
    }

    fn boundary(&self, region: Region) -> LineClass {
        if region == Region::Navigator && !self.kind.is_book() {
            LineClass::remove(region.role())
        } else {
            LineClass::ignore(region.role())
        }
    }

    fn content(&self, trimmed: &str) -> LineClass {
        let class = match self.open_region() {
            Some(Region::Header) => {
                if trimmed.starts_with(TITLE_KEY) {
                    LineClass::keep(LineRole::Title)
                } else if trimmed.starts_with(DESCRIPTION_KEY) {
                    LineClass::keep(LineRole::Description)
                } else {
                    LineClass::ignore(LineRole::Header)
                }
            }
            Some(Region::Navigator) if !self.kind.is_book() => {
                return LineClass::remove(LineRole::Navigator);
            }
            Some(Region::Image) => {
                if trimmed.starts_with(CAPTION_START) {
                    LineClass::keep(LineRole::Image)
                } else {
                    LineClass::ignore(LineRole::Image)
                }
            }
            Some(Region::Math) => LineClass::ignore(LineRole::Math),
            Some(region) => LineClass::keep(region.role()),
            None if trimmed.is_empty() => LineClass::ignore(LineRole::Blank),
            None if trimmed.starts_with(COPYRIGHT_START) => LineClass::keep(LineRole::Copyright),
            None => LineClass::keep(LineRole::Other),
        };

        if is_always_ignored(trimmed) {
            LineClass::ignore(class.role)
        } else {
            class
        }
    }
}
