//! LLM 提示词。两类调用都是 “system 指令 + user 内容” 的两条消息。

use crate::services::ChatMessage;

/// 标语生成指令。
pub const TAGLINE_INSTRUCTION: &str = "Please provide a witty advertising tagline that will be \
displayed at the bottom of the image described below. Please do not provide any additional \
text or descriptions, just the tagline only. If the tagline is more than 8 words long please \
insert a new line character. Do not structure response in JSON, only a string.";

/// 绘图指令生成的通用部分，前面拼接品牌相关的一句。
pub const SUMMARIZE_INSTRUCTION: &str = "Summarize the following idea into instructions for a \
text2image llm model. Do not mention the name of the brand and do not request any text. \
Instructions should be concise with limited usage of verbs and other sentence structure. Do not \
include any text that is unrelated to the instruction and return only a string, no JSON or other \
formatting.";

/// 将概念点子总结为文生图指令。
pub fn summarize_messages(concept: &str, brand: &str) -> Vec<ChatMessage> {
    let instruction = format!(
        "You are developing an image for advertising the {} brand. {}",
        brand, SUMMARIZE_INSTRUCTION
    );
    vec![ChatMessage::system(instruction), ChatMessage::user(concept)]
}

/// 为品牌与概念生成标语。
pub fn tagline_messages(concept: &str, brand: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TAGLINE_INSTRUCTION),
        ChatMessage::user(format!("{} brand with a background of {}", brand, concept)),
    ]
}
