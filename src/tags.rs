//! Tag accessor - reads and writes Album Artist / Release Type per container format
//!
//! Every write edits the file's native tag in place and saves that same tag,
//! so frames, comments and atoms the tagger does not know about are carried
//! through untouched. ID3v2 (MP3, AAC, WAV) goes through the `id3` crate;
//! Vorbis comments and MP4 ilst atoms go through `lofty`'s concrete file types.

use id3::frame::ExtendedText;
use id3::{TagLike, Version};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile as LoftyFile, TaggedFile, TaggedFileExt};
use lofty::flac::FlacFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::ogg::{VorbisComments, VorbisFile};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use crate::error::TagError;
use crate::models::{AudioFile, ContainerFormat};

/// Custom field name used for the release type
pub const RELEASE_TYPE_FIELD: &str = "RELEASETYPE";

/// Vorbis comment field holding the album artist
pub const VORBIS_ALBUM_ARTIST: &str = "ALBUMARTIST";

/// Freeform atom namespace for iTunes-style custom fields
pub const ITUNES_MEAN: &str = "com.apple.iTunes";

/// Tag storage scheme for a container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    /// ID3v2 at the head of the stream (MP3, ADTS AAC)
    Id3,
    /// ID3v2 inside a RIFF `ID3 ` chunk (WAV)
    RiffId3,
    /// Vorbis comment metadata block (FLAC)
    Flac,
    /// Vorbis comment packet (OGG Vorbis)
    OggVorbis,
    /// iTunes-style ilst atoms (MP4, M4A)
    Mp4,
    /// Whatever lofty picks as the primary tag (WMA)
    Generic,
}

impl From<ContainerFormat> for TagFormat {
    fn from(format: ContainerFormat) -> Self {
        match format {
            ContainerFormat::Mp3 | ContainerFormat::Aac => TagFormat::Id3,
            ContainerFormat::Wav => TagFormat::RiffId3,
            ContainerFormat::Flac => TagFormat::Flac,
            ContainerFormat::Ogg => TagFormat::OggVorbis,
            ContainerFormat::M4a | ContainerFormat::Mp4 => TagFormat::Mp4,
            ContainerFormat::Wma => TagFormat::Generic,
        }
    }
}

/// The two fields the tagger touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AlbumArtist,
    ReleaseType,
}

impl Field {
    fn vorbis_key(&self) -> &'static str {
        match self {
            Field::AlbumArtist => VORBIS_ALBUM_ARTIST,
            Field::ReleaseType => RELEASE_TYPE_FIELD,
        }
    }

    /// `aART` for the album artist, `----:com.apple.iTunes:RELEASETYPE` for the release type
    fn mp4_ident(&self) -> AtomIdent<'static> {
        match self {
            Field::AlbumArtist => AtomIdent::Fourcc(*b"aART"),
            Field::ReleaseType => AtomIdent::Freeform {
                mean: Cow::Borrowed(ITUNES_MEAN),
                name: Cow::Borrowed(RELEASE_TYPE_FIELD),
            },
        }
    }

    fn item_key(&self) -> ItemKey {
        match self {
            Field::AlbumArtist => ItemKey::AlbumArtist,
            Field::ReleaseType => ItemKey::Unknown(RELEASE_TYPE_FIELD.to_string()),
        }
    }
}

/// Uniform read/write access to the two fields the tagger cares about.
///
/// Values returned by [`TagAccess::album_artist`] are never blank: an empty
/// or whitespace-only field reads as `None`.
pub trait TagAccess {
    /// Read the Album Artist of a file
    fn album_artist(&self, file: &AudioFile) -> Result<Option<String>, TagError>;

    /// Read the Release Type of a file
    fn release_type(&self, file: &AudioFile) -> Result<Option<String>, TagError>;

    /// Write the Album Artist of a file and save it
    fn set_album_artist(&mut self, file: &AudioFile, value: &str) -> Result<(), TagError>;

    /// Write the Release Type of a file and save it
    fn set_release_type(&mut self, file: &AudioFile, value: &str) -> Result<(), TagError>;
}

/// Tag access backed by the audio files on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTags;

impl FileTags {
    pub fn new() -> Self {
        Self
    }
}

impl TagAccess for FileTags {
    fn album_artist(&self, file: &AudioFile) -> Result<Option<String>, TagError> {
        read_field(file, Field::AlbumArtist)
    }

    fn release_type(&self, file: &AudioFile) -> Result<Option<String>, TagError> {
        read_field(file, Field::ReleaseType)
    }

    fn set_album_artist(&mut self, file: &AudioFile, value: &str) -> Result<(), TagError> {
        write_field(file, Field::AlbumArtist, value)
    }

    fn set_release_type(&mut self, file: &AudioFile, value: &str) -> Result<(), TagError> {
        write_field(file, Field::ReleaseType, value)
    }
}

fn read_field(file: &AudioFile, field: Field) -> Result<Option<String>, TagError> {
    let path = file.path.as_path();
    match TagFormat::from(file.format) {
        format @ (TagFormat::Id3 | TagFormat::RiffId3) => {
            let tag = read_id3(path, format == TagFormat::RiffId3)?;
            Ok(tag.as_ref().and_then(|t| id3_text(t, field)))
        }
        TagFormat::Flac => {
            let flac: FlacFile = open_concrete(path)?;
            Ok(flac
                .vorbis_comments()
                .and_then(|vc| non_blank(vc.get(field.vorbis_key()))))
        }
        TagFormat::OggVorbis => {
            let ogg: VorbisFile = open_concrete(path)?;
            Ok(non_blank(ogg.vorbis_comments().get(field.vorbis_key())))
        }
        TagFormat::Mp4 => {
            let mp4: Mp4File = open_concrete(path)?;
            Ok(mp4
                .ilst()
                .and_then(|ilst| ilst_text(ilst, &field.mp4_ident())))
        }
        TagFormat::Generic => {
            let tagged = read_tagged(path)?;
            Ok(first_text(&tagged, &field.item_key()))
        }
    }
}

fn write_field(file: &AudioFile, field: Field, value: &str) -> Result<(), TagError> {
    let path = file.path.as_path();
    match TagFormat::from(file.format) {
        format @ (TagFormat::Id3 | TagFormat::RiffId3) => {
            let riff = format == TagFormat::RiffId3;
            let mut tag = read_id3(path, riff)?.unwrap_or_else(id3::Tag::new);
            set_id3_text(&mut tag, field, value);
            write_id3(path, &tag, riff)
        }
        TagFormat::Flac => {
            let mut flac: FlacFile = open_concrete(path)?;
            if flac.vorbis_comments().is_none() {
                let _ = flac.set_vorbis_comments(VorbisComments::default());
            }
            if let Some(vc) = flac.vorbis_comments_mut() {
                vc.insert(field.vorbis_key().to_string(), value.to_string());
            }
            save_concrete(&flac, path)
        }
        TagFormat::OggVorbis => {
            let mut ogg: VorbisFile = open_concrete(path)?;
            ogg.vorbis_comments_mut()
                .insert(field.vorbis_key().to_string(), value.to_string());
            save_concrete(&ogg, path)
        }
        TagFormat::Mp4 => {
            let mut mp4: Mp4File = open_concrete(path)?;
            if mp4.ilst().is_none() {
                let _ = mp4.set_ilst(Ilst::default());
            }
            if let Some(ilst) = mp4.ilst_mut() {
                set_ilst_text(ilst, field.mp4_ident(), value);
            }
            save_concrete(&mp4, path)
        }
        TagFormat::Generic => write_tagged(path, field.item_key(), value),
    }
}

/// Trimmed-empty values count as missing
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
}

fn id3_text(tag: &id3::Tag, field: Field) -> Option<String> {
    match field {
        Field::AlbumArtist => non_blank(tag.album_artist()),
        Field::ReleaseType => tag
            .extended_texts()
            .find(|txxx| txxx.description == RELEASE_TYPE_FIELD)
            .and_then(|txxx| non_blank(Some(txxx.value.as_str()))),
    }
}

fn set_id3_text(tag: &mut id3::Tag, field: Field, value: &str) {
    match field {
        Field::AlbumArtist => tag.set_album_artist(value),
        Field::ReleaseType => {
            tag.remove_extended_text(Some(RELEASE_TYPE_FIELD), None);
            let _ = tag.add_frame(ExtendedText {
                description: RELEASE_TYPE_FIELD.to_string(),
                value: value.to_string(),
            });
        }
    }
}

/// Load the ID3v2 tag of a file; a file without one is not an error
fn read_id3(path: &Path, riff: bool) -> Result<Option<id3::Tag>, TagError> {
    let result = if riff {
        id3::Tag::read_from_wav_path(path)
    } else {
        id3::Tag::read_from_path(path)
    };
    match result {
        Ok(tag) => Ok(Some(tag)),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(None),
        Err(e) => Err(TagError::from(e).at(path)),
    }
}

fn write_id3(path: &Path, tag: &id3::Tag, riff: bool) -> Result<(), TagError> {
    let result = if riff {
        tag.write_to_wav_path(path, Version::Id3v24)
    } else {
        tag.write_to_path(path, Version::Id3v24)
    };
    result.map_err(|e| TagError::write(path, e.to_string()))
}

/// First UTF-8 value of an atom
fn ilst_text(ilst: &Ilst, ident: &AtomIdent<'_>) -> Option<String> {
    ilst.get(ident)?.data().find_map(|data| match data {
        AtomData::UTF8(text) => non_blank(Some(text.as_str())),
        _ => None,
    })
}

fn set_ilst_text(ilst: &mut Ilst, ident: AtomIdent<'static>, value: &str) {
    ilst.replace_atom(Atom::new(ident, AtomData::UTF8(value.to_string())));
}

fn open_concrete<F: LoftyFile>(path: &Path) -> Result<F, TagError> {
    let mut file = File::open(path).map_err(|e| TagError::from(e).at(path))?;
    F::read_from(&mut file, ParseOptions::new()).map_err(|e| TagError::from(e).at(path))
}

fn save_concrete<F: LoftyFile>(file: &F, path: &Path) -> Result<(), TagError> {
    file.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::write(path, e.to_string()))
}

fn read_tagged(path: &Path) -> Result<TaggedFile, TagError> {
    Probe::open(path)
        .and_then(|opened| opened.read())
        .map_err(|e| TagError::from(e).at(path))
}

/// First non-blank value for `key`, primary tag first
fn first_text(tagged: &TaggedFile, key: &ItemKey) -> Option<String> {
    tagged
        .primary_tag()
        .into_iter()
        .chain(tagged.tags().iter())
        .find_map(|tag| non_blank(tag.get_string(key)))
}

/// Set `key` on the primary tag of a container lofty only exposes generically
fn write_tagged(path: &Path, key: ItemKey, value: &str) -> Result<(), TagError> {
    let mut tagged = read_tagged(path)?;

    if tagged.primary_tag().is_none() {
        let tag_type = tagged.primary_tag_type();
        let _ = tagged.insert_tag(Tag::new(tag_type));
    }

    let Some(tag) = tagged.primary_tag_mut() else {
        return Err(TagError::unsupported(path, "no writable tag"));
    };
    tag.insert_unchecked(TagItem::new(key, ItemValue::Text(value.to_string())));

    tagged
        .save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::write(path, e.to_string()))
}
