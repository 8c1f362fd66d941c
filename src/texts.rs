//! Bilingual (Amharic / English) texts shown to patients.

pub const CLINIC_NAME: &str = "Nina Medium Clinic";
pub const MAP_URL: &str = "https://maps.app.goo.gl/sCkAb8ghcHpZmQ6G8";

/// Welcome caption, rendered with HTML parse mode
pub fn welcome_html() -> String {
    format!(
        "👋 እንኳን ወደ <b>{CLINIC_NAME}</b> በደህና መጡ!\n\
         Welcome to <b>{CLINIC_NAME}</b> 💖\n\
         \n\
         🩺 የምንሰጣቸው አገልግሎቶች | Our Services:\n\
         • የጤና ምርመራ እና ምክር / Check-up &amp; Advice\n\
         • የህፃናት እና አባላት እንክብካቤ / Pediatric &amp; Family Care\n\
         • የሴቶች ጤና / Women's Health\n\
         • የህመም መቆጣጠሪያ / Pain Management\n\
         • የምርመራ ክፍል / Lab Services\n\
         \n\
         📍 ቦታ / Location: <a href=\"{MAP_URL}\">Click here to see map</a>\n\
         \n\
         📅 ለመመዝገብ ከታች ያለውን ቁልፍ ይጫኑ።\n\
         To book an appointment, press the button below."
    )
}

pub const CHOOSE_OPTION: &str = "እባክዎ አንዱን ይምረጡ / Please choose an option:";

pub const NAME_PROMPT: &str = "👤 ሙሉ ስምዎን ያስገቡ። / Please enter your Full Name:";

pub const CONTACT_PROMPT: &str =
    "📞 እባክዎ ስልክ ቁጥርዎን ወይም ኢሜይልዎን ያስገቡ / Please enter your Contact (phone or email):";

pub const SERVICE_PROMPT: &str = "🩺 የሚፈልጉትን አገልግሎት ይምረጡ / Please choose the service:";

pub const USE_SERVICE_BUTTONS: &str =
    "እባክዎ ከላይ ያሉትን የአገልግሎት ቁልፎች ይጫኑ። / Please press one of the service buttons above.";

pub fn datetime_prompt(year: i32) -> String {
    format!(
        "📅 እባክዎ የቀንና ሰዓት ያስገቡ / Enter preferred Date & Time (e.g., {year}-10-27 14:00):"
    )
}

pub const MESSAGE_PROMPT: &str =
    "💬 ተጨማሪ መልእክት ካለዎት ያስገቡ / Any additional message? (type \"none\" if none):";

pub const CANCELLED_NOTICE: &str = "❌ ሂደቱ ተሰርዟል። / Booking cancelled.";

pub const CANCELLED: &str = "Booking cancelled. Send /start to begin again. / እባክዎ /start ይጫኑ።";

pub const SEND_START: &str = "Send /start to begin the booking process. / እባክዎ /start ይጫኑ።";

pub const SESSION_EXPIRED: &str =
    "Session expired or in wrong step. Send /start to begin. / እባክዎ /start ይጫኑ።";

pub const GENERIC_ERROR: &str =
    "⚠️ An error occurred. Please send /start and try again. / ስህተት ተፈጥሯል፣ እባክዎ /start ይጫኑ።";

pub const START_BUTTON: &str = "ለመጀመር / Start";
pub const CANCEL_BUTTON: &str = "ተወው / Cancel";
pub const START_AGAIN_BUTTON: &str = "🔁 እንደገና ጀምር / Start Again";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_mentions_clinic_and_map() {
        let welcome = welcome_html();
        assert!(welcome.contains("<b>Nina Medium Clinic</b>"));
        assert!(welcome.contains(MAP_URL));
        // Bare ampersands would break the HTML parse mode
        assert!(!welcome.contains("& "));
    }

    #[test]
    fn test_datetime_prompt_uses_year() {
        assert!(datetime_prompt(2026).contains("2026-10-27 14:00"));
    }
}
