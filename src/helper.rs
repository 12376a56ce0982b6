//! Higher-level operations composed from one or more API calls.
//!
//! [`ThreePlayHelper`] borrows a configured [`ThreePlayApi`]. The selection
//! logic (which transcript is "active", which language a video is in) lives
//! in plain functions so it can be tested without a server.

use std::collections::BTreeMap;

use crate::api::{MediaFileFilter, TextOptions, ThreePlayApi, TranscriptFilter};
use crate::error::{Result, ThreePlayError};
use crate::models::{Language, MediaFile, Transcript, TranscriptStatus, TurnaroundLevel};
use crate::srt::{remove_dialogue_between, remove_dialogue_for_first_ts, total_ms};

/// End of the second segment when cutting, i.e. the end of the file.
pub const END_OF_FILE_TS: &str = "99:99:99,999";

pub struct ThreePlayHelper<'a> {
    api: &'a ThreePlayApi,
}

impl<'a> ThreePlayHelper<'a> {
    pub fn new(api: &'a ThreePlayApi) -> Self {
        Self { api }
    }

    /// Parses a turnaround name such as `"same day"`.
    ///
    /// A missing or blank name yields `default`.
    ///
    /// # Errors
    /// - `InvalidTurnaround` if the name matches no level
    pub fn as_turnaround<T: TurnaroundLevel>(name: Option<&str>, default: Option<T>) -> Result<Option<T>> {
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => T::from_name(name)
                .map(Some)
                .ok_or_else(|| ThreePlayError::InvalidTurnaround(name.to_string())),
            None => Ok(default),
        }
    }

    /// Primary language of a video, from its latest non-cancelled default transcript.
    ///
    /// Pass `transcripts` (sorted oldest first) to skip the lookup.
    pub async fn get_transcript_language(&self, video_id: &str, transcripts: Option<&[Transcript]>) -> Result<Language> {
        match transcripts {
            Some(transcripts) => latest_default_language(video_id, transcripts),
            None => {
                let filter = TranscriptFilter {
                    sort_by_created: true,
                    ..TranscriptFilter::video_id(video_id)
                };
                let transcripts = self.api.get_transcripts(&filter).await?.data;
                latest_default_language(video_id, &transcripts)
            }
        }
    }

    /// All transcripts for a video, sorted by creation time.
    ///
    /// # Errors
    /// - `NoSuchTranscript` if the video has none (matching the filters)
    pub async fn get_transcripts(
        &self,
        video_id: &str,
        status: Option<TranscriptStatus>,
        by_default: bool,
        latest_first: bool,
    ) -> Result<Vec<Transcript>> {
        let filter = TranscriptFilter {
            status,
            by_default,
            sort_by_created: true,
            latest_first,
            ..TranscriptFilter::video_id(video_id)
        };
        let transcripts = self.api.get_transcripts(&filter).await?.data;

        if transcripts.is_empty() {
            return Err(ThreePlayError::NoSuchTranscript {
                video_id: video_id.to_string(),
                has_lang_input: false,
            });
        }
        Ok(transcripts)
    }

    /// Most recently created media file for a video.
    ///
    /// # Errors
    /// - `NoSuchMediaFile` if the video has no media file
    pub async fn get_latest_media_file(&self, video_id: &str) -> Result<MediaFile> {
        let filter = MediaFileFilter {
            sort_by_created: true,
            latest_first: true,
            ..MediaFileFilter::video_id(video_id)
        };
        self.api
            .list_media_files(&filter)
            .await?
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ThreePlayError::NoSuchMediaFile {
                video_id: video_id.to_string(),
            })
    }

    pub async fn get_default_transcripts(
        &self,
        video_id: &str,
        status: Option<TranscriptStatus>,
        latest_first: bool,
    ) -> Result<Vec<Transcript>> {
        self.get_transcripts(video_id, status, true, latest_first)
            .await
    }

    /// Cancels the pending and in-progress transcripts of a video.
    ///
    /// Returns how many cancellations 3Play accepted. A video without
    /// transcripts has nothing to cancel.
    pub async fn cancel_transcripts(&self, video_id: &str) -> Result<usize> {
        let transcripts = self
            .api
            .get_transcripts(&TranscriptFilter::video_id(video_id))
            .await?
            .data;
        self.cancel_transcript_list(&transcripts).await
    }

    /// Cancels the open transcripts in `transcripts`; complete and cancelled ones are skipped.
    pub async fn cancel_transcript_list(&self, transcripts: &[Transcript]) -> Result<usize> {
        let mut cancelled = 0;
        for transcript in transcripts.iter().filter(|t| t.status.is_open()) {
            tracing::info!(
                "Attempting to cancel a {} transcript ({})",
                transcript.status,
                transcript.id
            );
            if self.api.cancel_transcript(transcript.id).await? {
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }

    /// Transcript id → language for the current captions of a video.
    ///
    /// These are the complete transcripts (original plus translations) on the
    /// media file of the latest default transcript.
    pub async fn get_active_transcripts(&self, video_id: &str) -> Result<BTreeMap<u64, Language>> {
        let transcripts = self.get_active_transcript_list(video_id).await?;
        transcripts
            .iter()
            .map(|transcript| transcript.language().map(|lang| (transcript.id, lang)))
            .collect()
    }

    /// Same selection as [`Self::get_active_transcripts`], as full records.
    pub async fn get_active_transcript_list(&self, video_id: &str) -> Result<Vec<Transcript>> {
        let filter = TranscriptFilter {
            sort_by_created: true,
            status: Some(TranscriptStatus::Complete),
            ..TranscriptFilter::video_id(video_id)
        };
        let transcripts = self.api.get_transcripts(&filter).await?.data;
        active_file_transcripts(video_id, transcripts)
    }

    /// SRT text for a transcript with the dialogue from `first_end` up to
    /// (not including) `second_start` cut out.
    ///
    /// `second_offset_ms` delays the second segment; the dialogue that
    /// falls into that gap is removed as well.
    ///
    /// # Errors
    /// - `InvalidTimestamp` if a timestamp cannot be parsed
    pub async fn cut_transcript_in_middle(
        &self,
        transcript_id: u64,
        first_end: &str,
        second_start: &str,
        second_offset_ms: u64,
        second_end: Option<&str>,
    ) -> Result<String> {
        let first_end_ms = parse_ts(first_end)?;
        let second_start_ms = parse_ts(second_start)?;
        let second_end_ms = parse_ts(second_end.unwrap_or(END_OF_FILE_TS))?;
        let resume_ms = offset_ts(first_end, first_end_ms, second_offset_ms)?;

        let options = TextOptions {
            clips: cut_clips(resume_ms, second_start_ms, second_end_ms),
            ..TextOptions::default()
        };
        let text = self
            .api
            .get_formatted_transcript_text(transcript_id, &options)
            .await?;

        // 3Play repeats the dialogue at the cut point, so it is removed here.
        if second_offset_ms > 0 {
            Ok(remove_dialogue_between(&text, first_end_ms, resume_ms))
        } else {
            Ok(remove_dialogue_for_first_ts(&text, first_end))
        }
    }

    /// The original SRT text and the text trimmed by `start_seconds`.
    pub async fn get_both_transcript_text(&self, transcript_id: u64, start_seconds: &str) -> Result<(String, String)> {
        let original = self
            .api
            .get_formatted_transcript_text(transcript_id, &TextOptions::default())
            .await?;
        let trimmed_options = TextOptions {
            start_seconds: Some(start_seconds.to_string()),
            ..TextOptions::default()
        };
        let trimmed = self
            .api
            .get_formatted_transcript_text(transcript_id, &trimmed_options)
            .await?;

        Ok((original, trimmed))
    }
}

fn parse_ts(ts: &str) -> Result<u64> {
    total_ms(ts).ok_or_else(|| ThreePlayError::InvalidTimestamp(ts.to_string()))
}

/// `ts_ms` moved forward by `offset_ms`.
fn offset_ts(ts: &str, ts_ms: u64, offset_ms: u64) -> Result<u64> {
    ts_ms
        .checked_add(offset_ms)
        .ok_or_else(|| ThreePlayError::InvalidTimestamp(format!("{ts} + {offset_ms}ms")))
}

/// Clips keeping `0..first_end_ms` and `second_start_ms..second_end_ms`.
fn cut_clips(first_end_ms: u64, second_start_ms: u64, second_end_ms: u64) -> Vec<String> {
    vec![
        format!("0,{first_end_ms}"),
        format!("{second_start_ms},{second_end_ms}"),
    ]
}

/// Language of the newest non-cancelled default transcript (input sorted oldest first).
fn latest_default_language(video_id: &str, transcripts: &[Transcript]) -> Result<Language> {
    let latest = transcripts
        .iter()
        .rev()
        .find(|t| t.default && t.status != TranscriptStatus::Cancelled)
        .ok_or_else(|| ThreePlayError::NoSuchTranscript {
            video_id: video_id.to_string(),
            has_lang_input: true,
        })?;

    tracing::info!(
        "Found latest transcript for video. file_id={}, transcript_id={}",
        latest.media_file_id,
        latest.id
    );
    latest.language()
}

/// Transcripts on the media file of the newest default transcript (input sorted oldest first).
fn active_file_transcripts(video_id: &str, transcripts: Vec<Transcript>) -> Result<Vec<Transcript>> {
    let media_file_id = transcripts
        .iter()
        .rev()
        .find(|t| t.default)
        .map(|t| t.media_file_id)
        .ok_or_else(|| ThreePlayError::NoSuchTranscript {
            video_id: video_id.to_string(),
            has_lang_input: false,
        })?;

    Ok(transcripts
        .into_iter()
        .filter(|t| t.media_file_id == media_file_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Turnaround, TurnaroundAd};
    use serde_json::json;

    fn transcript(id: u64, media_file_id: u64, default: bool, status: &str, language_id: i64) -> Transcript {
        serde_json::from_value(json!({
            "id": id,
            "media_file_id": media_file_id,
            "default": default,
            "type": "TranscribedTranscript",
            "language_id": language_id,
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_as_turnaround() {
        let parsed = ThreePlayHelper::as_turnaround(Some("same day"), Some(Turnaround::Standard)).unwrap();
        assert_eq!(parsed, Some(Turnaround::SameDay));

        let parsed = ThreePlayHelper::as_turnaround(Some("  "), Some(Turnaround::Rush)).unwrap();
        assert_eq!(parsed, Some(Turnaround::Rush));

        let parsed = ThreePlayHelper::as_turnaround::<TurnaroundAd>(None, None).unwrap();
        assert_eq!(parsed, None);

        let err = ThreePlayHelper::as_turnaround::<Turnaround>(Some("next week"), None).unwrap_err();
        assert_eq!(err.to_string(), "next week is not a valid turnaround level");
    }

    #[test]
    fn test_latest_default_language_skips_cancelled() {
        let transcripts = vec![
            transcript(1, 10, true, "complete", 1),
            transcript(2, 11, true, "complete", 13),
            transcript(3, 12, true, "cancelled", 5),
            transcript(4, 12, false, "complete", 7),
        ];
        assert_eq!(latest_default_language("abc", &transcripts).unwrap(), Language::Spanish);
    }

    #[test]
    fn test_latest_default_language_errors() {
        let err = latest_default_language("abc", &[transcript(1, 10, false, "complete", 1)]).unwrap_err();
        assert!(matches!(err, ThreePlayError::NoSuchTranscript { has_lang_input: true, .. }));

        let err = latest_default_language("abc", &[transcript(9, 10, true, "complete", 99)]).unwrap_err();
        assert!(matches!(
            err,
            ThreePlayError::InvalidLanguageId {
                language_id: 99,
                transcript_id: 9
            }
        ));
    }

    #[test]
    fn test_active_file_transcripts() {
        let transcripts = vec![
            transcript(1, 10, true, "complete", 1),
            transcript(2, 20, true, "complete", 1),
            transcript(3, 20, false, "complete", 13),
            transcript(4, 10, false, "complete", 5),
        ];
        let active = active_file_transcripts("abc", transcripts).unwrap();
        let ids: Vec<u64> = active.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let err = active_file_transcripts("abc", Vec::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cut_clips() {
        assert_eq!(
            cut_clips(10_500, 21_060, 362_439_999),
            vec!["0,10500", "21060,362439999"]
        );
        let resume_ms = offset_ts("00:00:10,500", 10_500, 1_000).unwrap();
        assert_eq!(cut_clips(resume_ms, 21_060, 28_140)[0], "0,11500");
    }

    #[test]
    fn test_offset_ts_overflow() {
        assert!(matches!(
            offset_ts("00:00:10,500", 10_500, u64::MAX),
            Err(ThreePlayError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_parse_ts() {
        assert_eq!(parse_ts("00:00:10,500").unwrap(), 10_500);
        assert!(matches!(
            parse_ts("ten seconds"),
            Err(ThreePlayError::InvalidTimestamp(_))
        ));
    }
}
