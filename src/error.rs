use std::error;
use std::fmt;
use std::io;




/**
 * Broad classification of an [`Error`]. Configuration errors come straight
 * from user input; consistency errors are derived checks on the geometry of
 * the hierarchy; run errors happen after construction.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Consistency,
    Run,
}




#[derive(Debug)]


/**
 * Error to represent an invalid hierarchy configuration, an inconsistent
 * patch geometry, or a failure while running or writing output. All of these
 * are fatal to the run.
 */
pub enum Error {
    UnknownBoundaryKind(String),
    UnknownModel(String),
    NoFields,
    InvalidParameter { name: &'static str, value: String },
    NoRefinementCenters,
    OddGuardCount(usize),
    OddChildZones(usize),
    UnsupportedRefinementRatio(usize),
    FootprintOutsideParent { offset: i64, num_zones: usize, parent_zones: usize },
    StencilOutsideParent { first: i64, last: i64, parent_width: usize },
    SpacingMismatch { spacing: f64, parent_spacing: f64 },
    MissingParent,
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    NotSeeded,
    UnknownOutputFormat(String),
    Encode(String),
    Io(io::Error),
}




// ============================================================================
impl Error {

    pub fn kind(&self) -> ErrorKind {
        use Error::*;

        match self {
            UnknownBoundaryKind(_)
            | UnknownModel(_)
            | NoFields
            | InvalidParameter { .. }
            | NoRefinementCenters => ErrorKind::Configuration,
            OddGuardCount(_)
            | OddChildZones(_)
            | UnsupportedRefinementRatio(_)
            | FootprintOutsideParent { .. }
            | StencilOutsideParent { .. }
            | SpacingMismatch { .. }
            | MissingParent
            | ShapeMismatch { .. } => ErrorKind::Consistency,
            NotSeeded
            | UnknownOutputFormat(_)
            | Encode(_)
            | Io(_) => ErrorKind::Run,
        }
    }

    pub(crate) fn invalid<T: fmt::Display>(name: &'static str, value: T) -> Self {
        Error::InvalidParameter { name, value: value.to_string() }
    }
}




// ============================================================================
impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            UnknownBoundaryKind(s) => write!(fmt, "unknown boundary kind: {}", s),
            UnknownModel(s) => write!(fmt, "unknown model: {}", s),
            NoFields => write!(fmt, "a field problem needs at least one field"),
            InvalidParameter { name, value } => write!(fmt, "invalid value for {}: {}", name, value),
            NoRefinementCenters => write!(fmt, "refined levels were requested but no refinement centers were given"),
            OddGuardCount(g) => write!(fmt, "refined patches need an even guard zone count, got {}", g),
            OddChildZones(n) => write!(fmt, "refined patches need an even zone count, got {}", n),
            UnsupportedRefinementRatio(r) => write!(fmt, "refinement ratio must be 2, got {}", r),
            FootprintOutsideParent { offset, num_zones, parent_zones } => write!(
                fmt,
                "child of {} zones at parent offset {} does not fit in a parent of {} zones",
                num_zones, offset, parent_zones),
            StencilOutsideParent { first, last, parent_width } => write!(
                fmt,
                "prolongation stencil {}..={} leaves the parent buffer of width {}",
                first, last, parent_width),
            SpacingMismatch { spacing, parent_spacing } => write!(
                fmt,
                "child spacing {} is not half the parent spacing {}",
                spacing, parent_spacing),
            MissingParent => write!(fmt, "refined patch was stepped without its parent"),
            ShapeMismatch { expected, found } => write!(
                fmt,
                "expected field data of shape {:?}, found {:?}",
                expected, found),
            NotSeeded => write!(fmt, "the hierarchy must be seeded before it is evolved"),
            UnknownOutputFormat(s) => write!(fmt, "unknown output format: {}", s),
            Encode(s) => write!(fmt, "failed to encode snapshot: {}", s),
            Io(e) => write!(fmt, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{Error, ErrorKind};

    #[test]
    fn errors_are_classified() {
        assert_eq!(Error::UnknownBoundaryKind("Mirror".into()).kind(), ErrorKind::Configuration);
        assert_eq!(Error::OddGuardCount(3).kind(), ErrorKind::Consistency);
        assert_eq!(Error::UnsupportedRefinementRatio(4).kind(), ErrorKind::Consistency);
        assert_eq!(Error::NotSeeded.kind(), ErrorKind::Run);
    }

    #[test]
    fn errors_display_their_cause() {
        assert_eq!(Error::OddGuardCount(3).to_string(), "refined patches need an even guard zone count, got 3");
        assert_eq!(Error::invalid("cfl", -1.0).to_string(), "invalid value for cfl: -1");
    }
}
