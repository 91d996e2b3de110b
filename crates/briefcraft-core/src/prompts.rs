//! Prompt templates for every pipeline step, in English and Spanish.
//!
//! Templates use `{name}` placeholders filled by [`render`]. Each step owns
//! the decision of which values it substitutes; this module only stores text.

use crate::language::Language;

/// Substitute `{key}` placeholders in a template.
///
/// Unknown placeholders are left untouched so a template typo shows up in the
/// generated prompt instead of silently disappearing.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

pub fn prompt_analyzer(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Analyze this marketing prompt and extract structured information.\n\
             Prompt: {input_prompt}\n\n\
             Extract: primary objective, target audience, brand cues, key facts, \
             urgency level (low/medium/high), target platform, tone indicators, \
             and content goals."
        }
        Language::Es => {
            "Analiza este prompt de marketing y extrae informacion estructurada.\n\
             Prompt: {input_prompt}\n\n\
             Extrae: objetivo principal, audiencia objetivo, senas de marca, hechos clave, \
             nivel de urgencia (low/medium/high), plataforma objetivo, indicadores de tono \
             y objetivos de contenido."
        }
    }
}

pub fn post_classifier(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Classify this marketing content request into exactly one post type.\n\
             Objective: {objective}\n\
             Audience: {audience}\n\
             Goals: {goals}\n\n\
             Choose one of: Launch, Educational, Promotional, Storytelling, Engagement.\n\
             Respond with the single word only."
        }
        Language::Es => {
            "Clasifica esta solicitud de contenido de marketing en exactamente un tipo.\n\
             Objetivo: {objective}\n\
             Audiencia: {audience}\n\
             Metas: {goals}\n\n\
             Elige uno de: Launch, Educational, Promotional, Storytelling, Engagement.\n\
             Responde solo con la palabra."
        }
    }
}

pub fn brand_voice(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Define the brand voice for this content.\n\
             Objective: {objective}\n\
             Audience: {audience}\n\
             Brand cues: {brand_cues}\n\
             Post type: {post_type}\n\n\
             Provide: tone, personality traits, communication style, \
             vocabulary level, and emotional tone."
        }
        Language::Es => {
            "Define la voz de marca para este contenido.\n\
             Objetivo: {objective}\n\
             Audiencia: {audience}\n\
             Senas de marca: {brand_cues}\n\
             Tipo de publicacion: {post_type}\n\n\
             Proporciona: tono, rasgos de personalidad, estilo de comunicacion, \
             nivel de vocabulario y tono emocional."
        }
    }
}

pub fn fact_grounding(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Ground this content in verifiable facts.\n\
             Key facts: {key_facts}\n\
             Objective: {objective}\n\n\
             Provide: verified facts, supporting data points, credibility markers, \
             and claims that need caution."
        }
        Language::Es => {
            "Fundamenta este contenido en hechos verificables.\n\
             Hechos clave: {key_facts}\n\
             Objetivo: {objective}\n\n\
             Proporciona: hechos verificados, datos de apoyo, marcadores de credibilidad \
             y afirmaciones que requieren cautela."
        }
    }
}

pub fn text_generator(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Write the main body text for a {post_type} social media post.\n\
             Objective: {objective}\n\
             Audience: {audience}\n\
             Tone: {tone}\n\
             Verified facts: {facts}\n\n\
             Write engaging, platform-ready copy. No markdown formatting, \
             no numbered lists, plain text only."
        }
        Language::Es => {
            "Escribe el texto principal para una publicacion {post_type} en redes sociales.\n\
             Objetivo: {objective}\n\
             Audiencia: {audience}\n\
             Tono: {tone}\n\
             Hechos verificados: {facts}\n\n\
             Escribe texto atractivo y listo para la plataforma. Sin formato markdown, \
             sin listas numeradas, solo texto plano."
        }
    }
}

pub fn caption_creator(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Create engagement elements for this post.\n\
             Body text: {generated_text}\n\
             Post type: {post_type}\n\
             Tone: {tone}\n\n\
             Provide: a caption, a call to action, relevant hashtags, \
             an opening hook, and an engagement question."
        }
        Language::Es => {
            "Crea elementos de engagement para esta publicacion.\n\
             Texto principal: {generated_text}\n\
             Tipo de publicacion: {post_type}\n\
             Tono: {tone}\n\n\
             Proporciona: un caption, una llamada a la accion, hashtags relevantes, \
             un gancho de apertura y una pregunta de engagement."
        }
    }
}

pub fn visual_concept(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Design a visual concept for this post.\n\
             Body text: {generated_text}\n\
             Post type: {post_type}\n\
             Brand tone: {tone}\n\n\
             Provide: concept description, visual style, color palette (hex codes), \
             composition notes, and imagery suggestions."
        }
        Language::Es => {
            "Disena un concepto visual para esta publicacion.\n\
             Texto principal: {generated_text}\n\
             Tipo de publicacion: {post_type}\n\
             Tono de marca: {tone}\n\n\
             Proporciona: descripcion del concepto, estilo visual, paleta de colores \
             (codigos hex), notas de composicion y sugerencias de imagenes."
        }
    }
}

pub fn reasoning(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Explain the strategic reasoning behind this content plan.\n\
             Objective: {objective}\n\
             Post type: {post_type}\n\
             Tone: {tone}\n\
             Body text: {generated_text}\n\n\
             Provide: strategic decisions made, audience alignment rationale, \
             expected impact, and risk considerations."
        }
        Language::Es => {
            "Explica el razonamiento estrategico detras de este plan de contenido.\n\
             Objetivo: {objective}\n\
             Tipo de publicacion: {post_type}\n\
             Tono: {tone}\n\
             Texto principal: {generated_text}\n\n\
             Proporciona: decisiones estrategicas tomadas, justificacion de alineacion \
             con la audiencia, impacto esperado y consideraciones de riesgo."
        }
    }
}

pub fn visual_format(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Recommend the best visual format for this post.\n\
             Post type: {post_type}\n\
             Platform: {platform}\n\
             Objective: {objective}\n\n\
             Choose exactly one of: Image, Video, Carousel, Infographic.\n\
             Respond with the single word only."
        }
        Language::Es => {
            "Recomienda el mejor formato visual para esta publicacion.\n\
             Tipo de publicacion: {post_type}\n\
             Plataforma: {platform}\n\
             Objetivo: {objective}\n\n\
             Elige exactamente uno de: Image, Video, Carousel, Infographic.\n\
             Responde solo con la palabra."
        }
    }
}

pub fn video_scripter(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Write a short-form video script for this post.\n\
             Body text: {generated_text}\n\
             Hook: {hook}\n\
             Call to action: {cta}\n\n\
             Provide: timed segments (start/end seconds, on-screen text, voiceover), \
             total duration in seconds, and production notes."
        }
        Language::Es => {
            "Escribe un guion de video corto para esta publicacion.\n\
             Texto principal: {generated_text}\n\
             Gancho: {hook}\n\
             Llamada a la accion: {cta}\n\n\
             Proporciona: segmentos con tiempos (segundos de inicio/fin, texto en pantalla, \
             voz en off), duracion total en segundos y notas de produccion."
        }
    }
}

pub fn result_optimizer(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Optimize this post text against historical performance patterns.\n\
             Current text: {generated_text}\n\
             Post type: {post_type}\n\
             Performance insights: {insights}\n\n\
             Rewrite the text applying the insights. Keep the meaning and tone. \
             Plain text only."
        }
        Language::Es => {
            "Optimiza este texto segun patrones historicos de rendimiento.\n\
             Texto actual: {generated_text}\n\
             Tipo de publicacion: {post_type}\n\
             Insights de rendimiento: {insights}\n\n\
             Reescribe el texto aplicando los insights. Manten el significado y el tono. \
             Solo texto plano."
        }
    }
}

pub fn contextual_awareness(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Adapt this post to current context.\n\
             Current text: {generated_text}\n\
             Month: {month}\n\
             Seasonal trends: {trends}\n\n\
             Weave in timely context where it fits naturally. Do not force it. \
             Plain text only."
        }
        Language::Es => {
            "Adapta esta publicacion al contexto actual.\n\
             Texto actual: {generated_text}\n\
             Mes: {month}\n\
             Tendencias de temporada: {trends}\n\n\
             Integra contexto oportuno donde encaje de forma natural. No lo fuerces. \
             Solo texto plano."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let out = render("Hello {name}, goal: {goal}", &[("name", "Ada"), ("goal", "launch")]);
        assert_eq!(out, "Hello Ada, goal: launch");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let out = render("Value: {missing}", &[("other", "x")]);
        assert_eq!(out, "Value: {missing}");
    }

    #[test]
    fn test_templates_exist_for_both_languages() {
        assert!(prompt_analyzer(Language::En).contains("{input_prompt}"));
        assert!(prompt_analyzer(Language::Es).contains("{input_prompt}"));
        assert!(post_classifier(Language::Es).contains("Launch"));
        assert!(visual_format(Language::En).contains("Carousel"));
    }
}
