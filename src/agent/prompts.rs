//! Prompt templates for the UI agent.
//!
//! Two conversation tracks:
//! - build: PLANNER_SYSTEM_PROMPT, then plan → code → explanation user turns
//! - modify: MODIFIER_SYSTEM_PROMPT, then a single modification turn
//!
//! The generated component must follow the preview convention: a default
//! exported `GeneratedUI` function importing each primitive from
//! `@/components/ui/<Name>`.

/// The only UI primitives the preview can render.
pub const COMPONENTS: &[&str] = &[
    "Button", "Input", "Card", "Modal", "Sidebar", "Navbar", "Table", "Chart",
];

/// Name of the default-exported component.
pub const COMPONENT_NAME: &str = "GeneratedUI";

/// Import namespace for the primitives.
pub const COMPONENT_NAMESPACE: &str = "@/components/ui";

/// System prompt for the build track.
pub const PLANNER_SYSTEM_PROMPT: &str = "\
You are an expert UI architect. You create JSON layout plans for React components.
You can ONLY use these 8 components: Button, Input, Card, Modal, Sidebar, Navbar, Table, Chart.
Always output valid JSON that follows this structure exactly.";

/// System prompt for the modify track.
pub const MODIFIER_SYSTEM_PROMPT: &str = "\
You are an expert React developer. You modify existing React components based on user requests.
You can ONLY use these components: Button, Input, Card, Modal, Sidebar, Navbar, Table, Chart from '@/components/ui/'.";

/// User turn asking for a JSON layout plan.
pub fn plan_prompt(request: &str) -> String {
    let components = COMPONENTS.join(", ");
    format!(
        "Create a detailed JSON layout plan for this UI request: \"{request}\"

Requirements:
- Use ONLY these components: {components}
- Structure: {{ \"layout\": {{ \"type\": \"container\", \"className\": \"...\", \"children\": [...] }}, \"components\": [...] }}
- Each component needs: {{ \"type\": \"ComponentName\", \"props\": {{ ... }}, \"children\": [...] }}
- Use Tailwind classes for styling (className prop)
- Include realistic props (labels, placeholders, data, etc.)
- For Table: include headers array and data array with sample data
- For Chart: include data array with {{ label, value, color? }} objects
- Make it professional and complete

Respond with ONLY the JSON plan, no markdown code blocks or explanations."
    )
}

/// User turn asking to turn a plan into component source.
pub fn code_prompt(plan_json: &str) -> String {
    format!(
        "Convert this JSON plan to a complete React + TypeScript component.

JSON Plan: {plan_json}

Requirements:
- Create a function component called \"{COMPONENT_NAME}\"
- Import each component used from '{COMPONENT_NAMESPACE}/[ComponentName]' (e.g., import {{ Button }} from '{COMPONENT_NAMESPACE}/Button')
- Use TypeScript with proper types
- Use Tailwind CSS for layout (flex, grid, gap, p-4, etc.)
- Include all mock data directly in the component
- Add useState hooks for any interactive state (modal open/close, form values, etc.)
- Make it fully functional and interactive
- Export as default: export default function {COMPONENT_NAME}() {{ ... }}

Return ONLY the TypeScript code, no markdown code blocks or explanations."
    )
}

/// User turn asking for a short, non-technical explanation.
pub fn explain_prompt(component_summary: &str) -> String {
    format!(
        "Explain this UI in 2-3 simple sentences for a non-technical user.

The UI includes these components: {component_summary}

Requirements:
- Friendly, casual tone
- Mention what the user can do with this UI
- Keep it brief and helpful"
    )
}

/// User turn asking to modify existing component source.
pub fn modify_prompt(current_code: &str, modification: &str) -> String {
    format!(
        "Modify this React component based on the user's request.

Current Code:
{current_code}

User Request: \"{modification}\"

Requirements:
- Keep the component name as \"{COMPONENT_NAME}\"
- Maintain existing functionality unless explicitly asked to change it
- Use the same import pattern: import {{ X }} from '{COMPONENT_NAMESPACE}/X'
- Use Tailwind CSS for styling
- Return the complete modified component

Return ONLY the TypeScript code, no markdown code blocks or explanations."
    )
}
