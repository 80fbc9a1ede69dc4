use super::{
    BotPersonality, Capability, CapabilityKind, Catalog, ModelMetadata, ModelSpec, Proficiency,
    Provider, Tone,
};

fn capability(kind: CapabilityKind, proficiency: Proficiency, description: &str) -> Capability {
    Capability {
        kind,
        proficiency,
        description: description.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(super) fn catalog() -> Catalog {
    Catalog::new(models(), personalities())
}

fn models() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            id: "gemma-3-12b-it".to_string(),
            name: "Google Gemma 3 12B Instruct".to_string(),
            description: "Advanced educational AI model optimized for interactive teaching and \
                          learning content generation"
                .to_string(),
            provider: Provider::OpenRouter,
            provider_model_id: "google/gemma-3-12b-it".to_string(),
            capabilities: vec![
                capability(
                    CapabilityKind::Education,
                    Proficiency::Expert,
                    "Exceptional at creating educational content, lesson plans, and interactive \
                     learning materials",
                ),
                capability(
                    CapabilityKind::TextGeneration,
                    Proficiency::Advanced,
                    "High-quality text generation with educational focus",
                ),
                capability(
                    CapabilityKind::Assessment,
                    Proficiency::Advanced,
                    "Can create quizzes, assessments, and educational evaluations",
                ),
            ],
            max_tokens: 8192,
            is_active: true,
            metadata: Some(ModelMetadata {
                context_window: Some(8192),
                training_data: Some("Up to 2024, optimized for educational content".to_string()),
                strengths: strings(&[
                    "Educational content",
                    "Curriculum design",
                    "Interactive materials",
                    "Student engagement",
                ]),
                limitations: strings(&["Limited context window compared to some newer models"]),
            }),
        },
        ModelSpec {
            id: "gpt-4-turbo".to_string(),
            name: "GPT-4 Turbo".to_string(),
            description: "OpenAI's most capable model for complex educational tasks and detailed \
                          content creation"
                .to_string(),
            provider: Provider::OpenRouter,
            provider_model_id: "openai/gpt-4-turbo".to_string(),
            capabilities: vec![
                capability(
                    CapabilityKind::Education,
                    Proficiency::Expert,
                    "Excellent for complex educational content and advanced pedagogy",
                ),
                capability(
                    CapabilityKind::CodeGeneration,
                    Proficiency::Expert,
                    "Superior code generation for educational programming content",
                ),
                capability(
                    CapabilityKind::Analysis,
                    Proficiency::Expert,
                    "Deep analysis of educational effectiveness and learning outcomes",
                ),
            ],
            max_tokens: 4096,
            is_active: false,
            metadata: Some(ModelMetadata {
                context_window: Some(128_000),
                training_data: Some(
                    "Extensive training data with focus on accuracy and reasoning".to_string(),
                ),
                strengths: strings(&[
                    "Complex reasoning",
                    "Code generation",
                    "Academic writing",
                    "Detailed analysis",
                ]),
                limitations: strings(&["Higher cost per token"]),
            }),
        },
    ]
}

fn personalities() -> Vec<BotPersonality> {
    vec![
        BotPersonality {
            id: "educational-specialist".to_string(),
            name: "Educational Specialist".to_string(),
            description: "Friendly, encouraging teacher focused on creating engaging educational \
                          content"
                .to_string(),
            tone: Tone::Enthusiastic,
            expertise: strings(&[
                "curriculum design",
                "student engagement",
                "interactive learning",
                "assessment creation",
            ]),
            system_prompt: "You are an expert educational content creator specializing in \
creating compelling, concise summaries of educational resources. Your goal is to create \
attractive, engaging summaries that preview what an educational resource would contain without \
generating the full content.

You should:
1. Create concise, compelling summaries (under 150 words)
2. Use engaging, marketing-friendly language
3. Focus on student benefits and learning outcomes
4. Highlight interactive and engaging elements
5. Use proper markdown formatting for visual appeal
6. Never ask questions back - always generate the summary directly
7. Make the content sound exciting and innovative
8. Include practical details like timing and age appropriateness

Format requirements:
- Use ## for titles
- Use **bold** for key features
- Use bullet points for lists
- Use *italics* for engagement elements
- Keep responses concise but compelling"
                .to_string(),
            examples: strings(&[
                "Create an interactive photosynthesis lab for Year 7 students",
                "Design a World War 2 timeline with primary sources",
                "Build fraction practice games for primary school",
            ]),
            is_active: true,
        },
        BotPersonality {
            id: "curriculum-architect".to_string(),
            name: "Curriculum Architect".to_string(),
            description: "Professional educator focused on standards-aligned curriculum \
                          development"
                .to_string(),
            tone: Tone::Professional,
            expertise: strings(&[
                "curriculum standards",
                "learning progressions",
                "assessment alignment",
                "educational policy",
            ]),
            system_prompt: "You are a professional curriculum architect with deep knowledge of \
educational standards and learning progressions. Your focus is on creating comprehensive, \
standards-aligned educational resources. You should:

1. Ensure alignment with relevant curriculum standards
2. Create clear learning progressions
3. Include formative and summative assessments
4. Provide differentiation strategies
5. Consider diverse learning styles and needs
6. Include success criteria and rubrics
7. Connect to real-world applications

Always provide structured, comprehensive educational resources that meet professional teaching \
standards."
                .to_string(),
            examples: strings(&[
                "Develop a complete unit on renewable energy for secondary science",
                "Create a mathematics progression for algebraic thinking",
                "Design literacy assessments for primary reading comprehension",
            ]),
            is_active: false,
        },
    ]
}
