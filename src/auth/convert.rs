//! Conversion: ProfileResponse → Profile.

use super::wire::ProfileResponse;
use super::Profile;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<ProfileResponse> for Profile {
    fn from(source: ProfileResponse) -> Self {
        Profile {
            username: source.username,
            name: non_blank(source.name),
            email: non_blank(source.email),
            referral_code: non_blank(source.reff_id),
            placement_code: non_blank(source.placement_id),
            status: source.status,
            role: source.role,
            balance: source.balance,
            points: source.points,
            left_count: source.left_count,
            right_count: source.right_count,
            star_level: non_blank(source.star_level),
            profile_picture: non_blank(source.profile_picture),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_username() {
        let resp: ProfileResponse =
            serde_json::from_str(r#"{"username": "karim", "name": "", "left_count": 3, "right_count": 5}"#)
                .unwrap();
        let profile: Profile = resp.into();
        assert!(profile.name.is_none());
        assert_eq!(profile.display_name(), "karim");
        assert_eq!(profile.downline_count(), 8);
    }
}
