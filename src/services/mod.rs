// gitlab-reporter services
// Services provide the resolution logic and the outward-facing plumbing:
// resolver, version extraction, URL translation, GitLab calls, labels,
// capture channel, issue submission and settings.

pub mod capture_channel;
pub mod gitlab_client;
pub mod issue_reporter;
pub mod label_groups;
pub mod profile_resolver;
pub mod settings_engine;
pub mod url_translator;
pub mod version_extractor;
