//! Instructions sent to the text generator

use crate::recovery::FormRequest;

/// Instruction sent with the case document
pub const CASE_SUMMARY_PROMPT: &str =
    "Give me all information you have about the case: the parties, their addresses, \
     the property, the relevant dates and amounts, and the claims and defenses raised.";

/// Instruction asking which forms the filing requires
pub const FORM_LIST_PROMPT: &str =
    "Analyse the attached filing and identify every form that has to be filled, based on \
     the defenses and forms that are checked in it. Return a JSON array in which each \
     record has exactly two keys, \"CACI Number\" and \"Jury Instructions\". Include every \
     checked form and output nothing else.";

/// Instruction for filling the attached blueprint for one form
pub fn fill_prompt(form: &FormRequest, case_summary: &str) -> String {
    format!(
        r#"Legal document generation task.
Fill in the attached template for the form "CACI Number": "{number}", "Jury Instructions": "{title}".
Use this case information to fill every placeholder (defendant, plaintiff, city, address and so on); make your best guess where the information is incomplete:
{summary}

The attached template has one JSON object per line, one per paragraph. Answer with a JSON array of the same objects, in the same order, keeping "style", "bold", "italic" and "color" as they are and changing only "text". Every object has this shape:
{{"style": "Normal", "runs": [{{"text": "", "bold": null, "italic": null, "color": null}}], "placeholders": []}}
Output nothing but the JSON array."#,
        number = form.number,
        title = form.title,
        summary = case_summary.trim(),
    )
}
