pub use mydesk_models::announcements::{
    Announcement, AnnouncementChanges, AnnouncementFilter, AnnouncementOrigin,
    CreateAnnouncementDto, DeleteAnnouncementDto, UpdateAnnouncementDto,
};
