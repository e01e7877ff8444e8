use crate::latex::escape::Escaped;

/// Renders the fixed document template around the submitted fields.
///
/// Substitution points only accept [`Escaped`] values, so a raw client
/// string cannot reach the markup.
pub fn render_document(name: &Escaped, email: &Escaped, message: &Escaped) -> String {
    format!(
        r"\documentclass{{article}}
\usepackage[utf8]{{inputenc}}
\usepackage[margin=1in]{{geometry}}

\begin{{document}}

\begin{{titlepage}}
\centering
\Huge\textbf{{User Information}}
\end{{titlepage}}

\section*{{User Information}}
\textbf{{Name:}} {name} \\
\textbf{{Email:}} {email} \\
\textbf{{Message:}} {message} \\

\end{{document}}
"
    )
}
