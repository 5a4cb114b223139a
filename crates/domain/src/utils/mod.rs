//! Pure helpers over ArchivesSpace JSON records

pub mod record_format;
