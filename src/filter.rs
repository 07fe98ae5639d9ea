use crate::models::Job;

/// Number of matches the public landing page shows.
pub const LANDING_LIMIT: usize = 6;

/// Case-insensitive substring match over title, company and tags.
/// An empty term matches everything.
pub fn matches(job: &Job, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    job.title.to_lowercase().contains(&term)
        || job
            .company
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&term))
        || job.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

pub fn filter_jobs<'a>(jobs: &'a [Job], term: &str) -> Vec<&'a Job> {
    jobs.iter().filter(|job| matches(job, term)).collect()
}

/// Landing page variant: the first few matches only.
pub fn landing_jobs<'a>(jobs: &'a [Job], term: &str) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| matches(job, term))
        .take(LANDING_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i64, title: &str, company: Option<&str>, tags: &[&str]) -> Job {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "company": company,
            "tags": tags,
        }))
        .unwrap()
    }

    fn sample() -> Vec<Job> {
        vec![
            job(1, "Rust Backend Developer", Some("Acme"), &["rust", "backend"]),
            job(2, "Frontend Engineer", Some("Globex"), &["React", "TypeScript"]),
            job(3, "Data Analyst", None, &["SQL"]),
            job(4, "Platform Engineer", Some("Rustic Labs"), &[]),
        ]
    }

    fn ids(jobs: &[&Job]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_matches_each_field_case_insensitively() {
        let jobs = sample();
        assert_eq!(ids(&filter_jobs(&jobs, "RUST")), vec![1, 4]);
        assert_eq!(ids(&filter_jobs(&jobs, "globex")), vec![2]);
        assert_eq!(ids(&filter_jobs(&jobs, "sql")), vec![3]);
        assert_eq!(ids(&filter_jobs(&jobs, "engineer")), vec![2, 4]);
        assert!(filter_jobs(&jobs, "cobol").is_empty());
    }

    #[test]
    fn test_empty_term_keeps_everything() {
        let jobs = sample();
        assert_eq!(filter_jobs(&jobs, "").len(), jobs.len());
    }

    #[test]
    fn test_padded_term_is_matched_literally() {
        let jobs = sample();
        assert_eq!(ids(&filter_jobs(&jobs, "rust ")), vec![1]);
        assert_eq!(ids(&filter_jobs(&jobs, " engineer")), vec![2, 4]);
        assert!(filter_jobs(&jobs, "   ").is_empty());
    }

    #[test]
    fn test_result_is_exact_subset() {
        let jobs = sample();
        for term in ["r", "e", "data", "ts", "labs", "x"] {
            let found = ids(&filter_jobs(&jobs, term));
            let expected: Vec<i64> = jobs
                .iter()
                .filter(|j| {
                    let t = term.to_lowercase();
                    j.title.to_lowercase().contains(&t)
                        || j.company.as_deref().unwrap_or("").to_lowercase().contains(&t)
                        || j.tags.iter().any(|g| g.to_lowercase().contains(&t))
                })
                .map(|j| j.id)
                .collect();
            assert_eq!(found, expected, "term {:?}", term);
        }
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let jobs = sample();
        for term in ["rust", "e", "", "analyst"] {
            let once: Vec<Job> = filter_jobs(&jobs, term).into_iter().cloned().collect();
            let twice = filter_jobs(&once, term);
            assert_eq!(ids(&twice), once.iter().map(|j| j.id).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_landing_shows_at_most_six() {
        let jobs: Vec<Job> = (1..=10).map(|i| job(i, "Engineer", None, &[])).collect();
        assert_eq!(landing_jobs(&jobs, "").len(), LANDING_LIMIT);
        assert_eq!(filter_jobs(&jobs, "").len(), 10);
        assert_eq!(ids(&landing_jobs(&jobs, "engineer")), vec![1, 2, 3, 4, 5, 6]);
    }
}
