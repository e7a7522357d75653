pub const QUIZ_GENERATION_PROMPT: &str = "You are an expert quiz author. Write a multiple-choice quiz that tests understanding of the source text supplied by the user.

### Requirements:

- **Length:** Approximately 10 questions. Use fewer only when the text is too short to support 10 distinct questions.
- **Options:** Each question has exactly 4 answer options.
- **Answer:** Exactly one option is correct, and the `answer` field repeats that option's text verbatim.
- **Grounding:** Every correct answer must be directly supported by the text. Do not rely on outside knowledge.
- **Distractors:** Incorrect options must be plausible for someone who skimmed the text, but clearly wrong to someone who read it.
- **Coverage:** Spread questions across the whole text rather than clustering on the opening paragraphs.

### Output:

Respond with a JSON object of the form {\"quizQuestions\": [{\"question\": string, \"options\": [string], \"answer\": string}]}. Do not add commentary.";

pub const QUIZ_REFINEMENT_PROMPT: &str = "You are a quiz refinement expert. The user provides an existing quiz as JSON and a message describing how it should change.

Apply the requested change and return the complete refined quiz as a JSON array of objects with the fields `question` (string), `options` (array of strings) and `answer` (string, matching one option verbatim). Keep questions the message does not mention unchanged.

Return only the JSON array. Do not include any explanation text, and do not deviate from this format.";

/// Appended to the chat transcript after a refined quiz has been applied.
pub const REFINEMENT_ACKNOWLEDGEMENT: &str = "Here is the refined quiz based on your request.";

pub const DEFAULT_DOCUMENT_TITLE: &str = "Uploaded Document";
pub const DEFAULT_WEBSITE_TITLE: &str = "Website Quiz";
pub const DEFAULT_VIDEO_TITLE: &str = "YouTube Video Quiz";
pub const PASTED_TEXT_LABEL: &str = "Pasted Text";
