use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use super::TrainedModel;
use crate::error::{AppError, AppResult};

/// Bumped whenever the serialized layout of `TrainedModel` changes
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format_version: u32,
    model: &'a TrainedModel,
}

#[derive(Deserialize)]
struct Artifact {
    format_version: u32,
    model: TrainedModel,
}

/// Writes the model atomically: a temp file in the same directory is persisted over `path`
pub fn save_model(model: &TrainedModel, path: &Path) -> AppResult<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(
            &mut writer,
            &ArtifactRef {
                format_version: FORMAT_VERSION,
                model,
            },
        )?;
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .map_err(|e| AppError::Io(e.error))?;

    tracing::info!(path = %path.display(), "Saved model artifact");
    Ok(())
}

pub fn load_model(path: &Path) -> AppResult<TrainedModel> {
    let file = File::open(path)?;
    let artifact: Artifact = bincode::deserialize_from(BufReader::new(file))?;

    if artifact.format_version != FORMAT_VERSION {
        return Err(AppError::ModelArtifact(format!(
            "unsupported format version {} (expected {})",
            artifact.format_version, FORMAT_VERSION
        )));
    }

    tracing::info!(
        path = %path.display(),
        courses = artifact.model.courses().len(),
        "Loaded model artifact"
    );
    Ok(artifact.model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;
    use crate::recommender::{CourseQuery, TrainingOptions};

    fn model() -> TrainedModel {
        let courses = vec![
            Course::new("Python Basics", "online", "beginner", "python, excel", "4 weeks", "https://a"),
            Course::new("SQL for ML", "bootcamp", "intermediate", "sql, machine learning", "6 weeks", "https://b"),
        ];
        TrainedModel::train(courses, TrainingOptions::default()).unwrap()
    }

    #[test]
    fn test_round_trip_reproduces_model_and_rankings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.bin");
        let original = model();

        save_model(&original, &path).unwrap();
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, original);

        let query = CourseQuery {
            skills: "sql, python",
            course_type: "online",
            level: "beginner",
        };
        assert_eq!(
            loaded.recommend(&query, 5, 2).unwrap(),
            original.recommend(&query, 5, 2).unwrap()
        );
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let original = model();
        let bytes = bincode::serialize(&ArtifactRef {
            format_version: FORMAT_VERSION + 1,
            model: &original,
        })
        .unwrap();
        fs::write(&path, bytes).unwrap();

        assert!(matches!(load_model(&path), Err(AppError::ModelArtifact(_))));
    }

    #[test]
    fn test_garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, b"not a model").unwrap();
        assert!(load_model(&path).is_err());
    }
}
