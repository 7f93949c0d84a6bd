//! Built-in sample portfolio.

use super::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn link(text: &str, href: &str) -> Link {
    Link {
        text: text.to_string(),
        href: href.to_string(),
    }
}

fn project(id: u32, title: &str, emoji: &str, description: &str, tags: &[&str], repo: &str) -> Project {
    Project {
        id,
        title: title.to_string(),
        description: description.to_string(),
        tags: strings(tags),
        emoji: emoji.to_string(),
        links: vec![
            link("Live", &format!("https://{repo}.example.com")),
            link("GitHub", &format!("https://github.com/example/{repo}")),
        ],
    }
}

fn job(id: u32, title: &str, company: &str, duration: &str, description: &str) -> ExperienceItem {
    ExperienceItem {
        id,
        title: title.to_string(),
        company: company.to_string(),
        duration: duration.to_string(),
        description: description.to_string(),
    }
}

fn category(name: &str, skills: &[&str]) -> SkillCategory {
    SkillCategory {
        name: name.to_string(),
        skills: strings(skills),
    }
}

pub(super) fn content() -> PortfolioContent {
    PortfolioContent {
        personal: Personal {
            name: "Alex Example".to_string(),
            title: "Senior Engineer - Full Stack Developer".to_string(),
            subtitle: "Distributed Systems & Web".to_string(),
            bio: "Full-stack engineer building fast, observable services and the interfaces on top of them.".to_string(),
            email: "alex@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            location: "Remote".to_string(),
        },
        hero: Hero {
            badge: "Senior Developer".to_string(),
            headline: "Alex Example".to_string(),
            description: "Building scalable services and responsive web applications, from message queues to pixel-level polish.".to_string(),
            cta_buttons: vec![
                CtaButton {
                    text: "View My Work".to_string(),
                    href: "#projects".to_string(),
                    variant: None,
                },
                CtaButton {
                    text: "Contact Me".to_string(),
                    href: "#contact".to_string(),
                    variant: Some("secondary".to_string()),
                },
            ],
            stats: vec![
                Stat { number: "500+".to_string(), label: "Problems Solved".to_string() },
                Stat { number: "5+".to_string(), label: "Years Experience".to_string() },
                Stat { number: "20+".to_string(), label: "Projects Shipped".to_string() },
            ],
        },
        about: About {
            title: "About Me".to_string(),
            description: "I design distributed systems and the dashboards people use to run them.".to_string(),
            content: "Most of my work sits where backend throughput meets frontend responsiveness: async pipelines, caching layers, real-time updates, and the interfaces that make them legible.".to_string(),
        },
        skills: Skills {
            title: "Technical Skills".to_string(),
            categories: vec![
                category("Languages", &["Rust", "TypeScript", "Python", "SQL"]),
                category("Backend & Frameworks", &["Axum", "Tokio", "Node.js"]),
                category("Frontend", &["React", "Svelte", "Responsive Design"]),
                category("Databases", &["PostgreSQL", "Redis", "SQLite"]),
                category("API & Protocols", &["REST", "gRPC", "WebSockets", "SSE"]),
                category("Cloud & DevOps", &["Docker", "Kubernetes", "Prometheus", "Git"]),
            ],
        },
        projects: Projects {
            title: "Featured Projects".to_string(),
            items: vec![
                project(
                    1,
                    "Event Pipeline",
                    "⚙️",
                    "Async ingestion pipeline with back-pressure, retries, and per-tenant quotas.",
                    &["Rust", "Kafka", "PostgreSQL"],
                    "event-pipeline",
                ),
                project(
                    2,
                    "Ops Dashboard",
                    "📊",
                    "Real-time operations dashboard streaming metrics over server-sent events.",
                    &["TypeScript", "React", "SSE"],
                    "ops-dashboard",
                ),
                project(
                    3,
                    "Edge Cache",
                    "🚀",
                    "Read-through cache in front of a slow upstream with TTL and stale-while-revalidate.",
                    &["Rust", "Redis", "Docker"],
                    "edge-cache",
                ),
                project(
                    4,
                    "Chat Service",
                    "💬",
                    "Presence-aware chat with reconnect handling and message ordering guarantees.",
                    &["WebSockets", "Node.js", "Redis"],
                    "chat-service",
                ),
            ],
        },
        experience: Experience {
            title: "Work Experience".to_string(),
            items: vec![
                job(1, "Senior Engineer", "Example Corp", "2023 – Present", "Lead on the platform team's async processing services."),
                job(2, "Engineer", "Example Corp", "2021 – 2023", "Built ingestion and reporting services and their dashboards."),
                job(3, "Software Developer", "Sample Labs", "2019 – 2021", "Full-stack work on customer-facing web applications."),
            ],
        },
        contact: Contact {
            title: "Let's Connect".to_string(),
            description: "Always happy to talk about new projects and opportunities.".to_string(),
            methods: vec![
                ContactMethod { kind: "Email".to_string(), value: "alex@example.com".to_string(), icon: "📧".to_string() },
                ContactMethod { kind: "Phone".to_string(), value: "+1 555 0100".to_string(), icon: "📱".to_string() },
                ContactMethod { kind: "Location".to_string(), value: "Remote".to_string(), icon: "📍".to_string() },
            ],
        },
        social: vec![
            SocialLink { name: "GitHub".to_string(), url: "https://github.com/example".to_string(), icon: "🐙".to_string() },
            SocialLink { name: "LinkedIn".to_string(), url: "https://linkedin.com/in/example".to_string(), icon: "💼".to_string() },
            SocialLink { name: "Email".to_string(), url: "mailto:alex@example.com".to_string(), icon: "✉️".to_string() },
        ],
    }
}
