use anyhow::Result;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Contact, GeneratedDocuments, JobOffer};

/// Baseline latency of the simulated external generation service.
pub const GENERATION_DELAY: Duration = Duration::from_secs(3);

/// Text up to the first period, or the whole description when there is none.
pub fn first_sentence(description: &str) -> &str {
    description.split('.').next().unwrap_or(description)
}

fn contact_line(contact: Option<&Contact>) -> String {
    let name = contact.map(|c| c.name.as_str()).unwrap_or("");
    let email = contact.map(|c| c.email.as_str()).unwrap_or("");
    format!("{} ({})", name, email)
}

/// Render resume text for an offer. Pure and total: identical input yields
/// identical output, and missing contacts render as empty fields.
pub fn generate_resume(offer: &JobOffer) -> String {
    let resume = format!(
        "\
Resume for {position} at {company}

Objective:
Seeking a position as {position} to contribute my skills and experience to a dynamic team.

Summary of Qualifications:
- Extensive experience in {position_lower} roles
- Strong understanding of {lead_lower}
- Proven track record of success in similar positions

Work Experience:
- Previous role related to {position}
- Accomplishments aligned with {description}

Education:
- Relevant degree in a field related to {position}

Skills:
- Skills extracted from job description: {description}

Interview Information:
Recruiter: {recruiter}
Hiring Manager: {hiring_manager}
",
        position = offer.position,
        company = offer.company,
        position_lower = offer.position.to_lowercase(),
        lead_lower = first_sentence(&offer.description).to_lowercase(),
        description = offer.description,
        recruiter = contact_line(offer.recruiters.first()),
        hiring_manager = contact_line(offer.hiring_managers.first()),
    );
    resume.trim().to_string()
}

/// Render cover-letter text for an offer. Same purity contract as
/// [`generate_resume`].
pub fn generate_cover_letter(offer: &JobOffer) -> String {
    let letter = format!(
        "\
Dear Hiring Manager,

I am writing to express my strong interest in the {position} position at {company}, as advertised. With my background and skills, I believe I would be a great fit for this role.

{lead}. This aligns perfectly with my experience and passion for the field.

Throughout my career, I have developed a strong skill set in {position_lower}, and I am excited about the opportunity to bring my expertise to your team. I am particularly drawn to the challenges and opportunities that this role presents.

I would welcome the chance to discuss how my background and skills would be an asset to {company}. Thank you for your time and consideration.

Sincerely,
[Your Name]

Interview Information:
Recruiter: {recruiter}
Hiring Manager: {hiring_manager}
",
        position = offer.position,
        company = offer.company,
        position_lower = offer.position.to_lowercase(),
        lead = first_sentence(&offer.description),
        recruiter = contact_line(offer.recruiters.first()),
        hiring_manager = contact_line(offer.hiring_managers.first()),
    );
    letter.trim().to_string()
}

/// The generation service behind the asynchronous boundary.
pub trait DocumentBackend: Send + Sync + 'static {
    fn generate(&self, offer: &JobOffer) -> Result<GeneratedDocuments>;
}

/// Bundled backend: the pure template pair. Never fails.
pub struct TemplateBackend;

impl DocumentBackend for TemplateBackend {
    fn generate(&self, offer: &JobOffer) -> Result<GeneratedDocuments> {
        Ok(GeneratedDocuments {
            resume: generate_resume(offer),
            cover_letter: generate_cover_letter(offer),
        })
    }
}

#[derive(Debug)]
pub enum GenerationUpdate {
    Ready {
        offer_id: Uuid,
        documents: GeneratedDocuments,
    },
    Failed {
        offer_id: Uuid,
        error: String,
    },
}

/// Runs document generation off the UI thread. Each request gets its own
/// worker thread that sleeps for the configured baseline delay and then runs
/// the backend; results are drained on the UI tick. If the receiving side is
/// gone by the time a result arrives (teardown mid-request), the result is
/// dropped rather than acted on.
pub struct DocumentWorker {
    backend: Arc<dyn DocumentBackend>,
    delay: Duration,
    updates_tx: Sender<GenerationUpdate>,
    updates_rx: Receiver<GenerationUpdate>,
}

impl DocumentWorker {
    pub fn new(backend: Arc<dyn DocumentBackend>, delay: Duration) -> Self {
        let (updates_tx, updates_rx) = channel();
        Self {
            backend,
            delay,
            updates_tx,
            updates_rx,
        }
    }

    pub fn request(&self, offer: JobOffer) {
        let backend = Arc::clone(&self.backend);
        let delay = self.delay;
        let tx = self.updates_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let update = match backend.generate(&offer) {
                Ok(documents) => GenerationUpdate::Ready {
                    offer_id: offer.id,
                    documents,
                },
                Err(err) => GenerationUpdate::Failed {
                    offer_id: offer.id,
                    error: err.to_string(),
                },
            };
            let _ = tx.send(update);
        });
    }

    /// Drain all completed generations without blocking.
    pub fn poll(&self) -> Vec<GenerationUpdate> {
        self.updates_rx.try_iter().collect()
    }

    /// Block until the next update arrives.
    #[cfg(test)]
    pub fn recv(&self) -> Option<GenerationUpdate> {
        self.updates_rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::NaiveDate;

    fn sample_offer() -> JobOffer {
        JobOffer {
            id: Uuid::new_v4(),
            company: "ACME".to_string(),
            company_logo: None,
            position: "Backend Engineer".to_string(),
            description: "Build APIs. Own services.".to_string(),
            posted_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            recruiters: vec![Contact {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                linkedin_url: None,
                avatar: None,
            }],
            hiring_managers: vec![Contact {
                name: "B".to_string(),
                email: "b@x.com".to_string(),
                linkedin_url: None,
                avatar: None,
            }],
            company_info: None,
        }
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Build APIs. Own services."), "Build APIs");
        assert_eq!(first_sentence("No period here"), "No period here");
        assert_eq!(first_sentence(""), "");
    }

    #[test]
    fn test_generators_are_pure() {
        let offer = sample_offer();
        assert_eq!(generate_resume(&offer), generate_resume(&offer));
        assert_eq!(generate_cover_letter(&offer), generate_cover_letter(&offer));
    }

    #[test]
    fn test_resume_interpolates_offer_fields() {
        let resume = generate_resume(&sample_offer());
        assert!(resume.contains("Backend Engineer"));
        assert!(resume.contains("Build APIs"));
        assert!(resume.contains("build apis"));
        assert!(resume.contains("Recruiter: A (a@x.com)"));
        assert!(resume.contains("Hiring Manager: B (b@x.com)"));
        for section in [
            "Objective:",
            "Summary of Qualifications:",
            "Work Experience:",
            "Education:",
            "Skills:",
            "Interview Information:",
        ] {
            assert!(resume.contains(section), "missing section {}", section);
        }
    }

    #[test]
    fn test_cover_letter_references_company_and_position() {
        let letter = generate_cover_letter(&sample_offer());
        assert!(letter.contains("Backend Engineer position at ACME"));
        assert!(letter.contains("Build APIs. This aligns"));
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("Sincerely,"));
    }

    #[test]
    fn test_missing_contacts_render_empty_not_error() {
        let mut offer = sample_offer();
        offer.recruiters.clear();
        offer.hiring_managers.clear();

        let resume = generate_resume(&offer);
        assert!(resume.contains("Recruiter:  ()"));
        assert!(resume.contains("Hiring Manager:  ()"));
    }

    #[test]
    fn test_worker_round_trip() {
        let worker = DocumentWorker::new(Arc::new(TemplateBackend), Duration::ZERO);
        let offer = sample_offer();
        let offer_id = offer.id;

        worker.request(offer);
        match worker.recv() {
            Some(GenerationUpdate::Ready {
                offer_id: id,
                documents,
            }) => {
                assert_eq!(id, offer_id);
                assert!(!documents.resume.is_empty());
                assert!(!documents.cover_letter.is_empty());
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    struct FailingBackend;

    impl DocumentBackend for FailingBackend {
        fn generate(&self, _offer: &JobOffer) -> Result<GeneratedDocuments> {
            Err(anyhow!("generation service unavailable"))
        }
    }

    #[test]
    fn test_worker_reports_failures() {
        let worker = DocumentWorker::new(Arc::new(FailingBackend), Duration::ZERO);
        let offer = sample_offer();
        let offer_id = offer.id;

        worker.request(offer);
        match worker.recv() {
            Some(GenerationUpdate::Failed { offer_id: id, error }) => {
                assert_eq!(id, offer_id);
                assert!(error.contains("unavailable"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_result_after_teardown_is_dropped() {
        let worker = DocumentWorker::new(Arc::new(TemplateBackend), Duration::ZERO);
        worker.request(sample_offer());
        // Dropping the worker drops the receiver; the spawned thread's send
        // fails silently instead of acting on stale state.
        drop(worker);
        thread::sleep(Duration::from_millis(50));
    }
}
