// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Default review personas and criteria.
//
// These are configuration values, not globals: `PanelDefaults` is built once
// (usually from ReviewConfig) and handed to the orchestrator, the team
// suggester and the mentor, so a run or a test can swap any persona out.

use crate::domain::agent::Agent;

pub const DEFAULT_MODEL: &str = "gpt-5.2-2025-12-11";

/// Temperature used for review turns and reviewer generation
pub const CONSISTENT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct PanelDefaults {
    /// Coordinator of panel reviews
    pub editor: Agent,

    /// Fixed critique role of individual reviews
    pub critic: Agent,

    /// Persona of the post-review guidance step
    pub mentor: Agent,

    /// Participants used when no panel is given and generation is off or fails
    pub reviewers: Vec<Agent>,

    pub criteria: Vec<String>,
}

impl PanelDefaults {
    /// Built-in biomedical panel backed by `model_id`
    pub fn biomedical(model_id: &str) -> Self {
        Self {
            editor: editor(model_id),
            critic: scientific_critic(model_id),
            mentor: scientific_mentor(model_id),
            reviewers: vec![
                methodology_reviewer(model_id),
                domain_expert(model_id),
                presentation_reviewer(model_id),
            ],
            criteria: biomedical_review_criteria(),
        }
    }

    /// Rebind every persona to another model
    pub fn with_model(self, model_id: &str) -> Self {
        Self {
            editor: self.editor.with_model(model_id),
            critic: self.critic.with_model(model_id),
            mentor: self.mentor.with_model(model_id),
            reviewers: self
                .reviewers
                .into_iter()
                .map(|r| r.with_model(model_id))
                .collect(),
            criteria: self.criteria,
        }
    }
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self::biomedical(DEFAULT_MODEL)
    }
}

pub fn editor(model_id: &str) -> Agent {
    Agent::new(
        "Editor",
        "scientific publishing, editorial decision-making, and manuscript evaluation for biomedical journals",
        "provide a fair and thorough assessment of the manuscript's suitability for publication, considering novelty, significance, and scientific rigor",
        "synthesize feedback from specialist reviewers, identify the most critical issues, and provide an overall recommendation on the manuscript",
        model_id,
    )
}

pub fn methodology_reviewer(model_id: &str) -> Agent {
    Agent::new(
        "Methodology Reviewer",
        "experimental design, statistical analysis, and methodological rigor in biomedical research",
        "ensure the methods are sound, reproducible, and appropriate for the research questions",
        "critically evaluate the experimental design, statistical approaches, sample sizes, controls, and reproducibility of the methods, and identify any methodological flaws or areas needing clarification",
        model_id,
    )
}

pub fn domain_expert(model_id: &str) -> Agent {
    Agent::new(
        "Domain Expert",
        "biomedical sciences, current literature, and the specific research area of the manuscript",
        "assess the scientific accuracy, novelty, and significance of the research in the context of the field",
        "evaluate whether the findings are novel, scientifically sound, and significant, and whether claims are supported by the data and placed in the context of existing literature",
        model_id,
    )
}

pub fn presentation_reviewer(model_id: &str) -> Agent {
    Agent::new(
        "Presentation Reviewer",
        "scientific writing, data visualization, and clear communication of research findings",
        "ensure the manuscript is clearly written, well-organized, and effectively communicates its findings",
        "evaluate the clarity of writing, quality of figures and tables, logical organization, and overall readability, and identify areas where presentation could be improved",
        model_id,
    )
}

pub fn scientific_critic(model_id: &str) -> Agent {
    Agent::new(
        "Scientific Critic",
        "providing rigorous critical feedback for scientific manuscripts",
        "ensure that reviews are thorough, fair, and constructively critical",
        "provide critical feedback on the review process to ensure all important issues are identified and feedback is actionable",
        model_id,
    )
}

pub fn scientific_mentor(model_id: &str) -> Agent {
    Agent::new(
        "Scientific Mentor",
        "guiding early-career scientists through the peer review process, manuscript revision strategy, and experimental design",
        "provide clear, actionable guidance to help authors successfully address reviewer concerns and improve their manuscript",
        "act as a supportive mentor who helps authors understand reviewer feedback, prioritize revisions, and plan both textual changes and experiments",
        model_id,
    )
}

pub fn biomedical_review_criteria() -> Vec<String> {
    [
        "Scientific rigor: Are the methods appropriate and well-executed?",
        "Novelty: Does this work represent a significant advance over existing literature?",
        "Significance: Will this work have an impact on the field?",
        "Data quality: Are the data convincing and properly analyzed?",
        "Reproducibility: Are sufficient details provided to reproduce the experiments?",
        "Claims vs. evidence: Are all claims supported by the presented data?",
        "Presentation: Is the manuscript clearly written and well-organized?",
        "Figures and tables: Are they clear, informative, and properly labeled?",
        "Ethics: Are there any ethical concerns with the research?",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}
