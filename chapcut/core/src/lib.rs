/*!
    Chapter removal for MP3 files.

    Reads the ID3v2 chapter frames of a file, decides which chapters to drop
    based on their titles, and produces a new file whose audio, chapter
    times, table of contents and VBR header all describe the shortened
    stream.
*/

mod chapter;
mod error;
mod file;
mod filter;
mod plan;
mod remove;
mod splice;

pub use chapcut_id3 as id3;
pub use chapcut_mpeg as mpeg;

pub use self::chapter::{Chapter, chapters, format_ms};
pub use self::error::{ChapterError, ChapterResult};
pub use self::file::Mp3File;
pub use self::filter::ChapterFilter;
pub use self::plan::{KeptChapter, RemovalPlan, SpliceMode, plan};
pub use self::remove::{RemovalReport, RemoveOptions, remove_chapters};
pub use self::splice::splice;
