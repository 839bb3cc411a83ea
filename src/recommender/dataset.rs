use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::Course;

/// One row of the training catalog CSV
#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Type")]
    course_type: String,
    #[serde(rename = "Level")]
    level: String,
    #[serde(rename = "Skills Covered", default)]
    skills_covered: Option<String>,
    #[serde(rename = "Duration", default)]
    duration: String,
    #[serde(rename = "URL", default)]
    url: String,
}

impl CourseRecord {
    fn into_course(self, line: u64) -> AppResult<Course> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Course on line {} has an empty title",
                line
            )));
        }

        Ok(Course::new(
            self.title,
            &self.course_type,
            &self.level,
            self.skills_covered.as_deref().unwrap_or(""),
            self.duration,
            self.url,
        ))
    }
}

/// Reads the catalog (`Title, Type, Level, Skills Covered, Duration, URL`)
pub fn load_courses<R: Read>(reader: R) -> AppResult<Vec<Course>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut row = csv::StringRecord::new();
    let mut courses = Vec::new();
    while reader.read_record(&mut row)? {
        // first line of the record; quoted fields can span several
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let record: CourseRecord = row.deserialize(Some(&headers))?;
        courses.push(record.into_course(line)?);
    }

    Ok(courses)
}

pub fn load_courses_from_path<P: AsRef<Path>>(path: P) -> AppResult<Vec<Course>> {
    let file = std::fs::File::open(path.as_ref())?;
    let courses = load_courses(std::io::BufReader::new(file))?;
    tracing::info!(
        path = %path.as_ref().display(),
        courses = courses.len(),
        "Loaded course catalog"
    );
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Title,Type,Level,Skills Covered,Duration,URL
Python Basics,Online,Beginner,\"Python, Excel\",4 weeks,https://example.com/py
Deep Learning,Bootcamp,ADVANCED,,12 weeks,https://example.com/dl
";

    #[test]
    fn test_load_courses_normalizes_rows() {
        let courses = load_courses(CSV.as_bytes()).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].title, "Python Basics");
        assert_eq!(courses[0].course_type, "online");
        assert_eq!(courses[0].skills_covered, vec!["python", "excel"]);
        assert_eq!(courses[0].url, "https://example.com/py");
    }

    #[test]
    fn test_missing_skills_become_empty() {
        let courses = load_courses(CSV.as_bytes()).unwrap();
        assert_eq!(courses[1].level, "advanced");
        assert!(courses[1].skills_covered.is_empty());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let csv = "Title,Type,Level,Skills Covered,Duration,URL\n ,Online,Beginner,python,1 week,https://x\n";
        let err = load_courses(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_empty_title_line_counts_multiline_fields() {
        let csv = "Title,Type,Level,Skills Covered,Duration,URL\n\
Python Basics,Online,Beginner,\"Python,\nExcel,\nSQL\",4 weeks,https://example.com/py\n\
 ,Online,Beginner,python,1 week,https://x\n";
        let err = load_courses(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("line 5")));
    }

    #[test]
    fn test_missing_column_is_a_dataset_error() {
        let csv = "Title,Level\nPython,Beginner\n";
        assert!(matches!(
            load_courses(csv.as_bytes()),
            Err(AppError::Dataset(_))
        ));
    }
}
